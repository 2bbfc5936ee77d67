use chrono::{Days, NaiveDate};
use log::{debug, trace};
use std::fmt;

use crate::error::{ScheduleError, ScheduleResult};
use crate::format::format_short_date;

/// Date format accepted for maturity dates (ISO calendar date).
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

const DAYS_PER_WEEK: u64 = 7;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Period {
    BaseReturn,
    PenaltyWeek(u32),
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::BaseReturn => write!(f, "Base Return"),
            Period::PenaltyWeek(week) => write!(f, "Week {} Penalty", week),
        }
    }
}

/// Span of calendar days covered by one schedule row.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DateRange {
    Through(NaiveDate),
    Span { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    pub fn end_date(&self) -> NaiveDate {
        match self {
            DateRange::Through(date) => *date,
            DateRange::Span { end, .. } => *end,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRange::Through(date) => write!(f, "Through {}", format_short_date(date)),
            DateRange::Span { start, end } => write!(
                f,
                "{} - {}",
                format_short_date(start),
                format_short_date(end)
            ),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleRow {
    pub period: Period,
    pub date_range: DateRange,
    pub principal: f64,
    pub interest: f64,
    pub total_return: f64,
    pub return_percentage: f64,
}

impl ScheduleRow {
    pub fn new(period: Period, date_range: DateRange, principal: f64, interest: f64) -> Self {
        Self {
            period,
            date_range,
            principal,
            interest,
            total_return: principal + interest,
            return_percentage: (interest / principal) * 100.,
        }
    }
}

impl fmt::Display for ScheduleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, principal ${:.4}, interest ${:.4}, total return ${:.4}, return {:.4}%",
            self.period,
            self.date_range,
            self.principal,
            self.interest,
            self.total_return,
            self.return_percentage
        )
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanParameters {
    pub principal: f64,
    pub base_interest_rate: f64,
    pub weekly_penalty_rate: f64,
    pub maturity_date: NaiveDate,
    pub weeks_to_project: u32,
}

impl LoanParameters {
    /// Builds validated parameters from raw values, parsing `maturity_date`
    /// as an ISO calendar date (`2024-12-27`).
    pub fn new(
        principal: f64,          // loan principal
        base_interest_rate: f64, // base rate as a percentage (i.e., 16.5)
        weekly_penalty_rate: f64, // weekly penalty as a percentage (i.e., 3.5)
        maturity_date: &str,     // ISO date anchoring week 0
        weeks_to_project: i64,   // penalty weeks to compute
    ) -> ScheduleResult<Self> {
        let maturity_date = NaiveDate::parse_from_str(maturity_date.trim(), ISO_DATE_FORMAT)
            .map_err(|e| {
                ScheduleError::invalid(
                    "maturity_date",
                    format!("'{}' is not a valid calendar date ({})", maturity_date, e),
                )
            })?;

        if weeks_to_project < 0 {
            return Err(ScheduleError::invalid(
                "weeks_to_project",
                format!("must not be negative, got {}", weeks_to_project),
            ));
        }
        let weeks_to_project = u32::try_from(weeks_to_project).map_err(|_| {
            ScheduleError::invalid(
                "weeks_to_project",
                format!("{} exceeds the supported range", weeks_to_project),
            )
        })?;

        let params = Self {
            principal,
            base_interest_rate,
            weekly_penalty_rate,
            maturity_date,
            weeks_to_project,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ScheduleResult<()> {
        if !self.principal.is_finite() || self.principal <= 0. {
            return Err(ScheduleError::invalid(
                "principal",
                format!("must be a positive amount, got {}", self.principal),
            ));
        }
        if !self.base_interest_rate.is_finite() {
            return Err(ScheduleError::invalid(
                "base_interest_rate",
                "must be a finite percentage",
            ));
        }
        if !self.weekly_penalty_rate.is_finite() {
            return Err(ScheduleError::invalid(
                "weekly_penalty_rate",
                "must be a finite percentage",
            ));
        }
        Ok(())
    }

    /// Interest earned through maturity, before any penalty accrues.
    pub fn base_interest(&self) -> f64 {
        self.principal * (self.base_interest_rate / 100.)
    }
}

/// Projects the loan's return through maturity followed by one row per
/// penalty week. The penalty compounds on the base interest only, never on
/// the prior week's total.
pub fn generate(params: &LoanParameters) -> ScheduleResult<Vec<ScheduleRow>> {
    params.validate()?;
    debug!(
        "generating schedule: principal {}, base rate {}%, penalty {}%/week, maturity {}, {} weeks",
        params.principal,
        params.base_interest_rate,
        params.weekly_penalty_rate,
        params.maturity_date,
        params.weeks_to_project
    );

    // the last week must end on a representable date before any row is built
    add_days(
        &params.maturity_date,
        u64::from(params.weeks_to_project) * DAYS_PER_WEEK,
    )?;

    let mut rows: Vec<ScheduleRow> = Vec::with_capacity(params.weeks_to_project as usize + 1);
    let base_interest = params.base_interest();
    let penalty_factor = 1. + (params.weekly_penalty_rate / 100.);

    // base row echoes the base rate rather than recomputing it from the ratio
    rows.push(ScheduleRow {
        period: Period::BaseReturn,
        date_range: DateRange::Through(params.maturity_date),
        principal: params.principal,
        interest: base_interest,
        total_return: params.principal + base_interest,
        return_percentage: params.base_interest_rate,
    });

    for week in 1..=params.weeks_to_project {
        let start = add_days(
            &params.maturity_date,
            (u64::from(week) - 1) * DAYS_PER_WEEK + 1,
        )?;
        let end = add_days(&start, DAYS_PER_WEEK - 1)?;
        let interest = base_interest * penalty_factor.powf(f64::from(week));

        let row = ScheduleRow::new(
            Period::PenaltyWeek(week),
            DateRange::Span { start, end },
            params.principal,
            interest,
        );
        trace!("{}", row);
        rows.push(row);
    }
    Ok(rows)
}

fn add_days(&date: &NaiveDate, days: u64) -> ScheduleResult<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or(ScheduleError::DateOutOfRange { date, days })
}

/// A generated schedule together with the parameters that produced it.
#[derive(Clone, PartialEq, Debug)]
pub struct PenaltySchedule {
    params: LoanParameters,
    rows: Vec<ScheduleRow>,
}

impl PenaltySchedule {
    pub fn new(params: LoanParameters) -> ScheduleResult<Self> {
        let rows = generate(&params)?;
        Ok(Self { params, rows })
    }

    pub fn parameters(&self) -> &LoanParameters {
        &self.params
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn get_row_count(&self) -> usize {
        self.rows.len()
    }

    /// Row 0 is the base return, row N is penalty week N.
    pub fn get_row_info(&self, &index: &usize) -> String {
        match self.rows.get(index) {
            Some(row) => row.to_string(),
            None => "No schedule information.".to_string(),
        }
    }

    pub fn get_row_detail(&self, &index: &usize) -> Option<&ScheduleRow> {
        self.rows.get(index)
    }

    pub fn base_row(&self) -> &ScheduleRow {
        &self.rows[0]
    }

    pub fn final_row(&self) -> &ScheduleRow {
        &self.rows[self.rows.len() - 1]
    }

    /// Interest added by penalties on top of the base return.
    pub fn penalty_accrued(&self) -> f64 {
        self.final_row().interest - self.base_row().interest
    }

    pub fn show_schedule(&self) {
        for row in &self.rows {
            println!("{}", row);
        }
    }
}
