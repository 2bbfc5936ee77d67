use log::info;
use std::io::Write;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
    Table,
};

use crate::error::ScheduleResult;
use crate::format::{
    format_currency, format_long_date, format_percentage, format_rate, FormatConfig,
};
use crate::loan::PenaltySchedule;

pub const REPORT_TITLE: &str = "Extended Bridge Loan Return Schedule";

const TABLE_HEADERS: [&str; 5] = ["Timeline", "Principal", "Interest", "Total Return", "Return %"];

const CSV_HEADERS: [&str; 6] = [
    "period",
    "date_range",
    "principal",
    "interest",
    "total_return",
    "return_percentage",
];

/// Title, optional project name and the loan terms the schedule was built from.
pub fn render_summary(project_name: &str, schedule: &PenaltySchedule, config: &FormatConfig) -> String {
    let params = schedule.parameters();

    let mut builder = Builder::default();
    builder.push_record(["Principal", "Base Rate", "Weekly Penalty", "Maturity Date"]);
    builder.push_record([
        format_currency(params.principal, config),
        format_rate(params.base_interest_rate),
        format_rate(params.weekly_penalty_rate),
        format_long_date(&params.maturity_date),
    ]);
    let mut terms = Table::from(builder);
    terms.with(Style::blank());

    let mut summary = String::from(REPORT_TITLE);
    summary.push('\n');
    if !project_name.is_empty() {
        summary.push_str(project_name);
        summary.push('\n');
    }
    summary.push('\n');
    summary.push_str(&terms.to_string());
    summary
}

pub fn render_table(schedule: &PenaltySchedule, config: &FormatConfig) -> String {
    let mut builder = Builder::default();
    builder.push_record(TABLE_HEADERS);
    for row in schedule.rows() {
        builder.push_record([
            format!("{}\n{}", row.period, row.date_range),
            format_currency(row.principal, config),
            format_currency(row.interest, config),
            format_currency(row.total_return, config),
            format_percentage(row.return_percentage, config),
        ]);
    }

    let mut table = Table::from(builder);
    table
        .with(Style::modern())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    table.to_string()
}

pub fn render_report(project_name: &str, schedule: &PenaltySchedule, config: &FormatConfig) -> String {
    format!(
        "{}\n\n{}",
        render_summary(project_name, schedule, config),
        render_table(schedule, config)
    )
}

/// Writes every row with unrounded amounts.
pub fn write_csv<W: Write>(schedule: &PenaltySchedule, writer: W) -> ScheduleResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;
    for row in schedule.rows() {
        wtr.write_record([
            row.period.to_string(),
            row.date_range.to_string(),
            row.principal.to_string(),
            row.interest.to_string(),
            row.total_return.to_string(),
            row.return_percentage.to_string(),
        ])?;
    }
    wtr.flush()?;
    info!("exported {} schedule rows", schedule.get_row_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::LoanParameters;
    use test_log::test;

    fn schedule(weeks: i64) -> PenaltySchedule {
        PenaltySchedule::new(LoanParameters::new(200000., 16.5, 3.5, "2024-12-27", weeks).unwrap())
            .unwrap()
    }

    #[test]
    fn test_render_table_columns_and_values() {
        let table = render_table(&schedule(2), &FormatConfig::default());

        for header in TABLE_HEADERS {
            assert!(table.contains(header), "missing header {}", header);
        }
        assert!(table.contains("Base Return"));
        assert!(table.contains("Through Dec 27"));
        assert!(table.contains("Week 1 Penalty"));
        assert!(table.contains("Dec 28 - Jan 3"));
        assert!(table.contains("Week 2 Penalty"));
        assert!(table.contains("Jan 4 - Jan 10"));
        assert!(table.contains("$200,000"));
        assert!(table.contains("$33,000"));
        assert!(table.contains("$233,000"));
        assert!(table.contains("$234,155"));
        assert!(table.contains("$235,350"));
        assert!(table.contains("16.5%"));
        assert!(table.contains("17.1%"));
        assert!(table.contains("17.7%"));
        assert!(!table.contains("Week 3 Penalty"));
    }

    #[test]
    fn test_render_summary() {
        let config = FormatConfig::default();
        let summary = render_summary("Harbor View Lofts", &schedule(6), &config);
        assert!(summary.starts_with(REPORT_TITLE));
        assert!(summary.contains("Harbor View Lofts"));
        assert!(summary.contains("$200,000"));
        assert!(summary.contains("16.5%"));
        assert!(summary.contains("3.5%"));
        assert!(summary.contains("12/27/2024"));

        let unnamed = render_summary("", &schedule(6), &config);
        assert!(unnamed.starts_with(&format!("{}\n\n", REPORT_TITLE)));
    }

    #[test]
    fn test_render_report_has_summary_then_table() {
        let report = render_report("", &schedule(1), &FormatConfig::default());
        let title = report.find(REPORT_TITLE).unwrap();
        let timeline = report.find("Timeline").unwrap();
        assert!(title < timeline);
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        write_csv(&schedule(1), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "period,date_range,principal,interest,total_return,return_percentage"
        );
        assert_eq!(lines[1], "Base Return,Through Dec 27,200000,33000,233000,16.5");
        assert!(lines[2].starts_with("Week 1 Penalty,Dec 28 - Jan 3,200000,34155"));
    }
}
