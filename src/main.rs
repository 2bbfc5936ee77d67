use clap::{Parser, ValueEnum};
use log::{debug, error, info, LevelFilter};
use simple_logger::SimpleLogger;
use std::{fs::File, io, process};

use penalty_schedule::report::{render_report, write_csv};
use penalty_schedule::{FormatConfig, LoanDetails, PenaltySchedule, ScheduleResult};

/// Projects a bridge loan's total return week by week past maturity
#[derive(Parser)]
#[command(
    name = "penalty-schedule",
    version,
    about = "Projects a bridge loan's total return week by week past maturity",
    long_about = "Computes the base return through maturity and one row per penalty week, \
                  with the weekly penalty compounding on the base interest. Parameters come \
                  from a shareable link and/or individual flags; flags win."
)]
struct Cli {
    /// Shareable link or bare query string to load parameters from
    #[arg(long)]
    link: Option<String>,

    /// Project name shown above the schedule
    #[arg(long)]
    project: Option<String>,

    /// Loan principal
    #[arg(long)]
    principal: Option<f64>,

    /// Base interest rate in percent (16.5 means 16.5%)
    #[arg(long)]
    base_rate: Option<f64>,

    /// Weekly penalty rate in percent
    #[arg(long)]
    penalty_rate: Option<f64>,

    /// Maturity date (YYYY-MM-DD)
    #[arg(long)]
    maturity_date: Option<String>,

    /// Number of penalty weeks to project
    #[arg(long, allow_hyphen_values = true)]
    weeks: Option<i64>,

    /// Output format
    #[arg(long, default_value = "table")]
    output: OutputFormat,

    /// Write CSV output to this file instead of stdout
    #[arg(long)]
    csv_file: Option<String>,

    /// Print a shareable link for these parameters built on this base URL
    #[arg(long)]
    share: Option<String>,

    /// Decimal places for currency amounts (0-12)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=12))]
    currency_decimals: u8,

    /// Decimal places for percentages (0-12)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=12))]
    percent_decimals: u8,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Plain,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = SimpleLogger::new().with_level(cli.log_level).init() {
        eprintln!("error: unable to start logging: {}", e);
    }

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> ScheduleResult<()> {
    let details = loan_details(&cli);
    let schedule = PenaltySchedule::new(details.to_parameters()?)?;
    info!(
        "projected {} weeks past {}",
        schedule.parameters().weeks_to_project,
        schedule.parameters().maturity_date
    );

    let config = FormatConfig {
        currency_decimals: usize::from(cli.currency_decimals),
        percent_decimals: usize::from(cli.percent_decimals),
        ..FormatConfig::default()
    };

    match cli.output {
        OutputFormat::Table => println!("{}", render_report(&details.project_name, &schedule, &config)),
        OutputFormat::Plain => schedule.show_schedule(),
        OutputFormat::Csv => match &cli.csv_file {
            Some(path) => write_csv(&schedule, File::create(path)?)?,
            None => write_csv(&schedule, io::stdout().lock())?,
        },
    }

    if let Some(base) = &cli.share {
        println!("\nShare: {}", details.share_link(base)?);
    }
    Ok(())
}

// a full link is tried first; anything that is not one is read as a bare query
fn loan_details(cli: &Cli) -> LoanDetails {
    let mut details = match cli.link.as_deref() {
        Some(link) => LoanDetails::from_link(link).unwrap_or_else(|e| {
            debug!("--link is not a full URL ({}), reading it as a query", e);
            LoanDetails::from_query(link)
        }),
        None => LoanDetails::default(),
    };

    if let Some(project) = &cli.project {
        details.project_name = project.clone();
    }
    if let Some(principal) = cli.principal {
        details.principal = principal;
    }
    if let Some(base_rate) = cli.base_rate {
        details.base_rate = base_rate;
    }
    if let Some(penalty_rate) = cli.penalty_rate {
        details.penalty_rate = penalty_rate;
    }
    if let Some(maturity_date) = &cli.maturity_date {
        details.maturity_date = maturity_date.clone();
    }
    if let Some(weeks) = cli.weeks {
        details.weeks = weeks;
    }
    details
}
