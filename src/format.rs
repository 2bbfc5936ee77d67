//! Presentation formatting for schedule values.
//!
//! Amounts stay unrounded in [`ScheduleRow`](crate::loan::ScheduleRow); rounding
//! happens only here, on the way to a table or summary.

use chrono::NaiveDate;

/// Most decimal places rendered; larger settings are clamped to this.
pub const MAX_DECIMALS: usize = 12;

/// Rendering shown for amounts that are not finite numbers.
pub const NOT_A_NUMBER: &str = "n/a";

#[derive(Clone, PartialEq, Debug)]
pub struct FormatConfig {
    pub currency_symbol: String,
    pub currency_decimals: usize,
    pub percent_decimals: usize,
    pub group_separator: char,
}

impl Default for FormatConfig {
    /// Whole-dollar US currency and one-decimal percentages.
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            currency_decimals: 0,
            percent_decimals: 1,
            group_separator: ',',
        }
    }
}

/// "$233,000" with the default config; negatives read "-$1,234".
pub fn format_currency(amount: f64, config: &FormatConfig) -> String {
    if !amount.is_finite() {
        return NOT_A_NUMBER.to_string();
    }
    let decimals = config.currency_decimals.min(MAX_DECIMALS);
    let rounded = round(amount, decimals);
    let digits = group_digits(rounded.abs(), decimals, config.group_separator);
    if rounded < 0. {
        format!("-{}{}", config.currency_symbol, digits)
    } else {
        format!("{}{}", config.currency_symbol, digits)
    }
}

/// Takes a percentage number (17.0775, not 0.170775) and renders "17.1%".
pub fn format_percentage(percentage: f64, config: &FormatConfig) -> String {
    if !percentage.is_finite() {
        return NOT_A_NUMBER.to_string();
    }
    let decimals = config.percent_decimals.min(MAX_DECIMALS);
    let rounded = round(percentage, decimals);
    let digits = group_digits(rounded.abs(), decimals, config.group_separator);
    if rounded < 0. {
        format!("-{}%", digits)
    } else {
        format!("{}%", digits)
    }
}

/// Shortest form of an input rate: 16.5 -> "16.5%", 3.0 -> "3%".
pub fn format_rate(rate: f64) -> String {
    format!("{}%", rate)
}

pub fn format_short_date(date: &NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

pub fn format_long_date(date: &NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

// rounds half away from zero, matching how currency is usually displayed
fn round(amt: f64, dec: usize) -> f64 {
    if amt == 0. {
        0.
    } else {
        let factor = 10_f64.powi(dec as i32);
        (amt * factor).round() / factor
    }
}

fn group_digits(value: f64, decimals: usize, separator: char) -> String {
    let fixed = format!("{:.*}", decimals, value);
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + decimals + 1);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_format_currency_whole_dollars() {
        let config = FormatConfig::default();
        assert_eq!(format_currency(233000., &config), "$233,000");
        assert_eq!(format_currency(35350.425, &config), "$35,350");
        assert_eq!(format_currency(234155.000000001, &config), "$234,155");
        assert_eq!(format_currency(999.5, &config), "$1,000");
        assert_eq!(format_currency(12., &config), "$12");
        assert_eq!(format_currency(0., &config), "$0");
        assert_eq!(format_currency(1234567890., &config), "$1,234,567,890");
    }

    #[test]
    fn test_format_currency_negative_and_non_finite() {
        let config = FormatConfig::default();
        assert_eq!(format_currency(-1234.2, &config), "-$1,234");
        assert_eq!(format_currency(-0.2, &config), "$0");
        assert_eq!(format_currency(f64::NAN, &config), NOT_A_NUMBER);
        assert_eq!(format_currency(f64::INFINITY, &config), NOT_A_NUMBER);
    }

    #[test]
    fn test_format_currency_with_cents() {
        let config = FormatConfig {
            currency_decimals: 2,
            ..FormatConfig::default()
        };
        assert_eq!(format_currency(1000.125, &config), "$1,000.13");
        assert_eq!(format_currency(1000.5, &config), "$1,000.50");
    }

    #[test]
    fn test_format_percentage() {
        let config = FormatConfig::default();
        assert_eq!(format_percentage(16.5, &config), "16.5%");
        assert_eq!(format_percentage(17.0775, &config), "17.1%");
        assert_eq!(format_percentage(17.6752125, &config), "17.7%");
        assert_eq!(format_percentage(20., &config), "20.0%");
        assert_eq!(format_percentage(1234.56, &config), "1,234.6%");
        assert_eq!(format_percentage(-2.25, &config), "-2.3%");
    }

    #[test]
    fn test_large_decimal_settings_are_clamped() {
        let wide = FormatConfig {
            currency_decimals: 400,
            percent_decimals: 400,
            ..FormatConfig::default()
        };
        let capped = FormatConfig {
            currency_decimals: MAX_DECIMALS,
            percent_decimals: MAX_DECIMALS,
            ..FormatConfig::default()
        };
        assert_eq!(format_percentage(17.5, &wide), format_percentage(17.5, &capped));
        assert_eq!(format_percentage(17.5, &wide), "17.500000000000%");
        assert_eq!(format_currency(1234.5, &wide), format_currency(1234.5, &capped));
        assert!(!format_currency(1234.5, &wide).contains("NaN"));
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(16.5), "16.5%");
        assert_eq!(format_rate(3.), "3%");
    }

    #[test]
    fn test_format_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 27).unwrap();
        assert_eq!(format_short_date(&date), "Dec 27");
        assert_eq!(format_long_date(&date), "12/27/2024");

        let date = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert_eq!(format_short_date(&date), "Jan 3");
        assert_eq!(format_long_date(&date), "1/3/2025");
    }
}
