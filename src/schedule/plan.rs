use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::interval::{TimeInterval, TimeUnit};

/// One charge in a payment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledCharge {
    pub amount: f64,
    pub due_date: NaiveDate,
    pub is_deposit: bool,
}

/// Ordered charges plus the cadence they were generated with.
///
/// `items` is sorted by due date. When a deposit was requested it is always the
/// first element and is due on the anchor date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub items: Vec<ScheduledCharge>,
    pub has_deposit: bool,
    pub interval: TimeUnit,
    pub interval_count: u32,
}

impl Plan {
    pub fn empty(interval: TimeUnit, interval_count: u32) -> Self {
        Self {
            items: Vec::new(),
            has_deposit: false,
            interval,
            interval_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn cadence(&self) -> TimeInterval {
        TimeInterval::new(self.interval_count, self.interval)
    }

    pub fn deposit(&self) -> Option<&ScheduledCharge> {
        self.items.first().filter(|charge| charge.is_deposit)
    }

    pub fn regular_charges(&self) -> impl Iterator<Item = &ScheduledCharge> {
        self.items.iter().filter(|charge| !charge.is_deposit)
    }

    pub fn total_scheduled(&self) -> f64 {
        self.items.iter().map(|charge| charge.amount).sum()
    }

    pub fn final_due_date(&self) -> Option<NaiveDate> {
        self.items.last().map(|charge| charge.due_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_shape() {
        let plan = Plan {
            items: vec![ScheduledCharge {
                amount: 200.0,
                due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                is_deposit: true,
            }],
            has_deposit: true,
            interval: TimeUnit::Month,
            interval_count: 1,
        };
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["hasDeposit"], true);
        assert_eq!(json["interval"], "month");
        assert_eq!(json["intervalCount"], 1);
        assert_eq!(json["items"][0]["dueDate"], "2024-01-01");
        assert_eq!(json["items"][0]["isDeposit"], true);
    }

    #[test]
    fn empty_plan_has_no_dates() {
        let plan = Plan::empty(TimeUnit::Week, 2);
        assert!(plan.is_empty());
        assert_eq!(plan.deposit(), None);
        assert_eq!(plan.final_due_date(), None);
        assert_eq!(plan.total_scheduled(), 0.0);
    }
}
