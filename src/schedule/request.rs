use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::interval::{TimeInterval, TimeUnit};
use crate::errors::PlanError;

/// Upper bound on the number of regular installments in one plan.
pub const MAX_INSTALLMENTS: u32 = 1200;

/// Parameters for a payment plan. Values are immutable; every edit yields a new request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub total_amount: f64,
    #[serde(default)]
    pub deposit_amount: f64,
    pub installment_count: u32,
    #[serde(default)]
    pub interval: TimeUnit,
    #[serde(default = "default_interval_count")]
    pub interval_count: u32,
    pub anchor_date: NaiveDate,
}

fn default_interval_count() -> u32 {
    1
}

impl PlanRequest {
    /// Empty request anchored on `anchor_date`: nothing owed, monthly cadence.
    pub fn starting_on(anchor_date: NaiveDate) -> Self {
        Self {
            total_amount: 0.0,
            deposit_amount: 0.0,
            installment_count: 0,
            interval: TimeUnit::Month,
            interval_count: default_interval_count(),
            anchor_date,
        }
    }

    pub fn starting_today(clock: &dyn Clock) -> Self {
        Self::starting_on(clock.today())
    }

    pub fn with_total(mut self, total_amount: f64) -> Self {
        self.total_amount = total_amount;
        self
    }

    pub fn with_deposit(mut self, deposit_amount: f64) -> Self {
        self.deposit_amount = deposit_amount;
        self
    }

    pub fn with_installments(mut self, installment_count: u32) -> Self {
        self.installment_count = installment_count;
        self
    }

    pub fn with_interval(mut self, interval: TimeUnit, interval_count: u32) -> Self {
        self.interval = interval;
        self.interval_count = interval_count;
        self
    }

    pub fn with_anchor(mut self, anchor_date: NaiveDate) -> Self {
        self.anchor_date = anchor_date;
        self
    }

    pub fn cadence(&self) -> TimeInterval {
        TimeInterval::new(self.interval_count, self.interval)
    }

    pub fn has_deposit(&self) -> bool {
        self.deposit_amount > 0.0
    }

    /// Returns a copy of this request with `field` replaced by the parsed `raw` value.
    pub fn apply(&self, field: PlanField, raw: &str) -> Result<Self, PlanError> {
        let next = self.clone();
        Ok(match field {
            PlanField::Total => next.with_total(parse_amount(field, raw)?),
            PlanField::Deposit => next.with_deposit(parse_amount(field, raw)?),
            PlanField::Installments => {
                let count = parse_count(field, raw)?;
                if count > MAX_INSTALLMENTS {
                    return Err(PlanError::TooManyInstallments {
                        max: MAX_INSTALLMENTS,
                    });
                }
                next.with_installments(count)
            }
            PlanField::Interval => {
                let unit = raw.parse::<TimeUnit>()?;
                let count = next.interval_count;
                next.with_interval(unit, count)
            }
            PlanField::IntervalCount => {
                let count = parse_count(field, raw)?;
                let unit = next.interval;
                next.with_interval(unit, count)
            }
            PlanField::Anchor => next.with_anchor(parse_date(field, raw)?),
        })
    }
}

/// Editable inputs of a [`PlanRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanField {
    Total,
    Deposit,
    Installments,
    Interval,
    IntervalCount,
    Anchor,
}

impl PlanField {
    pub const ALL: [PlanField; 6] = [
        PlanField::Total,
        PlanField::Deposit,
        PlanField::Installments,
        PlanField::Interval,
        PlanField::IntervalCount,
        PlanField::Anchor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlanField::Total => "total",
            PlanField::Deposit => "deposit",
            PlanField::Installments => "installments",
            PlanField::Interval => "interval",
            PlanField::IntervalCount => "frequency",
            PlanField::Anchor => "start",
        }
    }
}

impl fmt::Display for PlanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlanField {
    type Err = PlanError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = raw.trim().to_ascii_lowercase().replace(['_', '-'], "");
        match key.as_str() {
            "total" | "totalamount" => Ok(PlanField::Total),
            "deposit" | "depositamount" => Ok(PlanField::Deposit),
            "installments" | "installmentcount" | "count" => Ok(PlanField::Installments),
            "interval" | "unit" => Ok(PlanField::Interval),
            "frequency" | "intervalcount" | "every" => Ok(PlanField::IntervalCount),
            "start" | "anchor" | "anchordate" => Ok(PlanField::Anchor),
            _ => Err(PlanError::UnknownField(raw.trim().to_string())),
        }
    }
}

fn parse_amount(field: PlanField, raw: &str) -> Result<f64, PlanError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|ch| *ch != ',')
        .collect();
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    cleaned.parse::<f64>().map_err(|err| PlanError::InvalidField {
        field: field.name(),
        reason: err.to_string(),
    })
}

fn parse_count(field: PlanField, raw: &str) -> Result<u32, PlanError> {
    raw.trim().parse::<u32>().map_err(|err| PlanError::InvalidField {
        field: field.name(),
        reason: err.to_string(),
    })
}

fn parse_date(field: PlanField, raw: &str) -> Result<NaiveDate, PlanError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|err| PlanError::InvalidField {
        field: field.name(),
        reason: err.to_string(),
    })
}
