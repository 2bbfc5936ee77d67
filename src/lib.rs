pub mod error;
pub mod format;
pub mod link;
pub mod loan;
pub mod report;

pub use error::{ScheduleError, ScheduleResult};
pub use format::FormatConfig;
pub use link::LoanDetails;
pub use loan::{generate, DateRange, LoanParameters, PenaltySchedule, Period, ScheduleRow};

// verifies that types can be shared freely between callers
#[cfg(test)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<LoanParameters>();
    is_normal::<ScheduleRow>();
    is_normal::<PenaltySchedule>();
    is_normal::<LoanDetails>();
    is_normal::<ScheduleError>();
}
