use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Duration, Months, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Date-based ISO-8601 period as used by the catalogue (`doorlooptijd`, `servicenorm`,
/// `archiefactietermijn`, `reactietermijn`) and by zaak extensions (`verlenging.duur`).
///
/// Weeks are folded into days when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IsoPeriod {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error("'{0}' is not an ISO-8601 period")]
    Invalid(String),
    #[error("adding {period} to {date} leaves the supported date range")]
    OutOfRange { period: IsoPeriod, date: NaiveDate },
    #[error("a span of {0} days does not fit in a period")]
    DaysOutOfRange(i64),
}

fn period_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^([-+]?)P(?:([-+]?\d+)Y)?(?:([-+]?\d+)M)?(?:([-+]?\d+)W)?(?:([-+]?\d+)D)?$",
        )
        .expect("period pattern compiles")
    })
}

impl IsoPeriod {
    pub fn of_days(days: i32) -> Self {
        Self {
            years: 0,
            months: 0,
            days,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, PeriodError> {
        let trimmed = raw.trim();
        let captures = period_pattern()
            .captures(trimmed)
            .ok_or_else(|| PeriodError::Invalid(raw.to_string()))?;

        if (2..=5).all(|index| captures.get(index).is_none()) {
            return Err(PeriodError::Invalid(raw.to_string()));
        }

        let component = |index: usize| -> Result<i32, PeriodError> {
            captures
                .get(index)
                .map(|value| value.as_str().parse::<i32>())
                .transpose()
                .map(|value| value.unwrap_or(0))
                .map_err(|_| PeriodError::Invalid(raw.to_string()))
        };

        let negated = &captures[1] == "-";
        let signed = |value: i32| -> Result<i32, PeriodError> {
            if negated {
                value
                    .checked_neg()
                    .ok_or_else(|| PeriodError::Invalid(raw.to_string()))
            } else {
                Ok(value)
            }
        };
        let weeks = component(4)?;
        let plain_days = component(5)?;
        let days = weeks
            .checked_mul(7)
            .and_then(|week_days| week_days.checked_add(plain_days))
            .ok_or_else(|| PeriodError::Invalid(raw.to_string()))?;

        Ok(Self {
            years: signed(component(2)?)?,
            months: signed(component(3)?)?,
            days: signed(days)?,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }

    pub fn plus_days(self, days: i32) -> Result<Self, PeriodError> {
        let total = self
            .days
            .checked_add(days)
            .ok_or(PeriodError::DaysOutOfRange(i64::from(self.days) + i64::from(days)))?;
        Ok(Self {
            days: total,
            ..self
        })
    }

    /// Adds the month part first, clamping to the end of the month, then the days.
    pub fn add_to(&self, date: NaiveDate) -> Result<NaiveDate, PeriodError> {
        let out_of_range = || PeriodError::OutOfRange {
            period: *self,
            date,
        };
        let total_months = i64::from(self.years) * 12 + i64::from(self.months);
        let months = Months::new(
            u32::try_from(total_months.unsigned_abs()).map_err(|_| out_of_range())?,
        );
        let shifted = if total_months >= 0 {
            date.checked_add_months(months)
        } else {
            date.checked_sub_months(months)
        }
        .ok_or_else(out_of_range)?;

        shifted
            .checked_add_signed(Duration::days(i64::from(self.days)))
            .ok_or_else(out_of_range)
    }

    /// Number of calendar days this period spans when applied to `from`.
    pub fn days_from(&self, from: NaiveDate) -> Result<i64, PeriodError> {
        Ok((self.add_to(from)? - from).num_days())
    }
}

impl fmt::Display for IsoPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("P0D");
        }
        f.write_str("P")?;
        if self.years != 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months != 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        Ok(())
    }
}

impl FromStr for IsoPeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for IsoPeriod {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IsoPeriod> for String {
    fn from(value: IsoPeriod) -> Self {
        value.to_string()
    }
}
