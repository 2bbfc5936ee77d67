//! Loan details carried in a shareable link.
//!
//! This is the only place where unusable input is silently replaced by a
//! default. Everything past [`LoanDetails::to_parameters`] is validated.

use log::{debug, warn};
use std::borrow::Cow;
use url::{form_urlencoded, Url};

use crate::error::ScheduleResult;
use crate::loan::LoanParameters;

pub const PROJECT_KEY: &str = "project";
pub const PRINCIPAL_KEY: &str = "principal";
pub const BASE_RATE_KEY: &str = "baseRate";
pub const PENALTY_RATE_KEY: &str = "penaltyRate";
pub const MATURITY_DATE_KEY: &str = "maturityDate";
pub const WEEKS_KEY: &str = "weeks";

const LINK_KEYS: [&str; 6] = [
    PROJECT_KEY,
    PRINCIPAL_KEY,
    BASE_RATE_KEY,
    PENALTY_RATE_KEY,
    MATURITY_DATE_KEY,
    WEEKS_KEY,
];

pub const DEFAULT_PRINCIPAL: f64 = 200000.;
pub const DEFAULT_BASE_RATE: f64 = 16.5;
pub const DEFAULT_PENALTY_RATE: f64 = 3.5;
pub const DEFAULT_MATURITY_DATE: &str = "2024-12-27";
pub const DEFAULT_WEEKS: i64 = 6;

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanDetails {
    pub project_name: String,
    pub principal: f64,
    pub base_rate: f64,
    pub penalty_rate: f64,
    pub maturity_date: String,
    pub weeks: i64,
}

impl Default for LoanDetails {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            principal: DEFAULT_PRINCIPAL,
            base_rate: DEFAULT_BASE_RATE,
            penalty_rate: DEFAULT_PENALTY_RATE,
            maturity_date: DEFAULT_MATURITY_DATE.to_string(),
            weeks: DEFAULT_WEEKS,
        }
    }
}

impl LoanDetails {
    /// Reads a bare query string such as `principal=150000&weeks=4`. A
    /// leading `?` is ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()).collect())
    }

    /// Reads the query of a full link, e.g. one produced by [`share_link`].
    ///
    /// [`share_link`]: LoanDetails::share_link
    pub fn from_link(link: &str) -> ScheduleResult<Self> {
        let url = Url::parse(link.trim())?;
        Ok(Self::from_pairs(url.query_pairs().collect()))
    }

    fn from_pairs(pairs: Vec<(Cow<'_, str>, Cow<'_, str>)>) -> Self {
        let lookup = |key: &str| first_value(&pairs, key);

        let details = Self {
            project_name: text_or(lookup(PROJECT_KEY), "", PROJECT_KEY),
            principal: number_or(lookup(PRINCIPAL_KEY), DEFAULT_PRINCIPAL, PRINCIPAL_KEY),
            base_rate: number_or(lookup(BASE_RATE_KEY), DEFAULT_BASE_RATE, BASE_RATE_KEY),
            penalty_rate: number_or(
                lookup(PENALTY_RATE_KEY),
                DEFAULT_PENALTY_RATE,
                PENALTY_RATE_KEY,
            ),
            maturity_date: text_or(
                lookup(MATURITY_DATE_KEY),
                DEFAULT_MATURITY_DATE,
                MATURITY_DATE_KEY,
            ),
            weeks: number_or(lookup(WEEKS_KEY), DEFAULT_WEEKS as f64, WEEKS_KEY).floor() as i64,
        };
        debug!("loan details from link: {:?}", details);
        details
    }

    pub fn to_parameters(&self) -> ScheduleResult<LoanParameters> {
        LoanParameters::new(
            self.principal,
            self.base_rate,
            self.penalty_rate,
            &self.maturity_date,
            self.weeks,
        )
    }

    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        self.append_pairs(&mut serializer);
        serializer.finish()
    }

    /// Places these details on `base`, replacing any loan keys already in its
    /// query and keeping unrelated pairs.
    pub fn share_link(&self, base: &str) -> ScheduleResult<String> {
        let mut url = Url::parse(base.trim())?;
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !LINK_KEYS.iter().any(|key| k == key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.set_query(None);
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &kept {
                pairs.append_pair(k, v);
            }
            self.append_pairs(&mut pairs);
        }
        Ok(url.to_string())
    }

    fn append_pairs<T>(&self, pairs: &mut form_urlencoded::Serializer<'_, T>)
    where
        T: form_urlencoded::Target,
    {
        pairs
            .append_pair(PROJECT_KEY, &self.project_name)
            .append_pair(PRINCIPAL_KEY, &self.principal.to_string())
            .append_pair(BASE_RATE_KEY, &self.base_rate.to_string())
            .append_pair(PENALTY_RATE_KEY, &self.penalty_rate.to_string())
            .append_pair(MATURITY_DATE_KEY, &self.maturity_date)
            .append_pair(WEEKS_KEY, &self.weeks.to_string());
    }
}

// first occurrence wins, as browsers do for repeated keys
fn first_value<'a>(pairs: &'a [(Cow<'_, str>, Cow<'_, str>)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_ref())
}

fn text_or(value: Option<&str>, default: &str, key: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        Some(_) => {
            warn!("{} is empty, using default '{}'", key, default);
            default.to_string()
        }
        None => default.to_string(),
    }
}

// zero counts as unusable, as does anything that is not a finite number
fn number_or(value: Option<&str>, default: f64, key: &str) -> f64 {
    let Some(raw) = value else {
        return default;
    };
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n != 0. => n,
        _ => {
            warn!("{}='{}' is not usable, using default {}", key, raw, default);
            default
        }
    }
}
