use std::{fmt, str::FromStr};

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::PlanError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 4] = [TimeUnit::Day, TimeUnit::Week, TimeUnit::Month, TimeUnit::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = PlanError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(TimeUnit::Day),
            "week" | "weeks" => Ok(TimeUnit::Week),
            "month" | "months" => Ok(TimeUnit::Month),
            "year" | "years" => Ok(TimeUnit::Year),
            other => Err(PlanError::InvalidField {
                field: "interval",
                reason: format!("`{}` is not one of day, week, month, year", other),
            }),
        }
    }
}

/// Billing cadence: `every` units of `unit` between consecutive charges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeInterval {
    pub every: u32,
    pub unit: TimeUnit,
}

impl TimeInterval {
    pub fn new(every: u32, unit: TimeUnit) -> Self {
        Self { every, unit }
    }

    /// Date that lies `steps * every` units after `anchor`.
    ///
    /// The offset is always taken from the anchor, so month-end clamping never
    /// accumulates: Jan 31 advanced two months lands on Mar 31, not Mar 28.
    /// Returns `None` when the result leaves the representable calendar.
    pub fn offset(&self, anchor: NaiveDate, steps: u32) -> Option<NaiveDate> {
        let units = u64::from(steps).checked_mul(u64::from(self.every))?;
        match self.unit {
            TimeUnit::Day => anchor.checked_add_days(Days::new(units)),
            TimeUnit::Week => anchor.checked_add_days(Days::new(units.checked_mul(7)?)),
            TimeUnit::Month => {
                let months = u32::try_from(units).ok()?;
                anchor.checked_add_months(Months::new(months))
            }
            TimeUnit::Year => {
                let months = u32::try_from(units.checked_mul(12)?).ok()?;
                anchor.checked_add_months(Months::new(months))
            }
        }
    }

    pub fn label(&self) -> String {
        match (self.every, self.unit) {
            (1, TimeUnit::Day) => "Daily".into(),
            (1, TimeUnit::Week) => "Weekly".into(),
            (1, TimeUnit::Month) => "Monthly".into(),
            (1, TimeUnit::Year) => "Yearly".into(),
            (n, unit) => format!("Every {} {}s", n, unit),
        }
    }
}

impl Default for TimeInterval {
    fn default() -> Self {
        Self::new(1, TimeUnit::Month)
    }
}
