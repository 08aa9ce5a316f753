use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::plan::{Plan, ScheduledCharge};
use super::request::{PlanRequest, MAX_INSTALLMENTS};
use crate::errors::PlanError;

const MAX_MINOR_UNIT_DIGITS: u8 = 9;

/// How regular installment amounts are derived from the remaining balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "mode", content = "digits")]
pub enum AmountPrecision {
    /// Plain floating-point division, no rounding.
    #[default]
    Exact,
    /// Round to the given number of decimals; the rounding remainder lands on the final
    /// installment so the charges add up to the total. Digits above 9 are treated as 9.
    MinorUnits(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overflow {
    Clamp,
    Reject,
}

/// Turns plan parameters into an ordered list of charges. Stateless; a new plan is
/// built from scratch on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleGenerator {
    precision: AmountPrecision,
}

impl ScheduleGenerator {
    pub fn new(precision: AmountPrecision) -> Self {
        Self { precision }
    }

    /// Builds the plan without validating inputs.
    ///
    /// A non-positive total or installment count yields an empty plan, and so does a
    /// count above [`MAX_INSTALLMENTS`]. Other bad inputs pass through: a deposit above
    /// the total produces negative installments.
    pub fn generate(&self, request: &PlanRequest) -> Plan {
        match self.build(request, Overflow::Clamp) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(error = %err, "plan not generated");
                let mut plan = Plan::empty(request.interval, request.interval_count);
                plan.has_deposit = request.has_deposit();
                plan
            }
        }
    }

    /// Validates the request, then builds the plan.
    pub fn generate_checked(&self, request: &PlanRequest) -> Result<Plan, PlanError> {
        validate(request)?;
        self.build(request, Overflow::Reject)
    }

    fn build(&self, request: &PlanRequest, overflow: Overflow) -> Result<Plan, PlanError> {
        let has_deposit = request.has_deposit();
        let mut plan = Plan::empty(request.interval, request.interval_count);
        plan.has_deposit = has_deposit;

        if !(request.total_amount > 0.0 && request.installment_count > 0) {
            tracing::trace!(
                total = request.total_amount,
                installments = request.installment_count,
                "nothing to schedule"
            );
            return Ok(plan);
        }
        if request.installment_count > MAX_INSTALLMENTS {
            return Err(PlanError::TooManyInstallments {
                max: MAX_INSTALLMENTS,
            });
        }

        let amounts = match self.precision {
            AmountPrecision::Exact => exact_amounts(request),
            AmountPrecision::MinorUnits(digits) => match minor_unit_amounts(request, digits) {
                Some(amounts) => amounts,
                None if overflow == Overflow::Clamp => {
                    tracing::warn!(digits, "amounts too large to round; using exact division");
                    exact_amounts(request)
                }
                None => return Err(PlanError::AmountOutOfRange { digits }),
            },
        };
        let cadence = request.cadence();
        plan.items.reserve(amounts.len());

        for (index, (amount, is_deposit)) in (0u32..).zip(amounts) {
            let due_date = match cadence.offset(request.anchor_date, index) {
                Some(date) => date,
                None if overflow == Overflow::Clamp => {
                    tracing::warn!(index, "due date overflows the calendar; clamping");
                    NaiveDate::MAX
                }
                None => return Err(PlanError::DateOutOfRange { index }),
            };
            plan.items.push(ScheduledCharge {
                amount,
                due_date,
                is_deposit,
            });
        }

        tracing::debug!(
            charges = plan.items.len(),
            has_deposit,
            interval = %cadence.unit,
            every = cadence.every,
            "generated payment plan"
        );
        Ok(plan)
    }
}

fn exact_amounts(request: &PlanRequest) -> Vec<(f64, bool)> {
    let count = request.installment_count as usize;
    let has_deposit = request.has_deposit();
    let mut amounts = Vec::with_capacity(count + usize::from(has_deposit));
    if has_deposit {
        amounts.push((request.deposit_amount, true));
    }
    let per_installment =
        (request.total_amount - request.deposit_amount) / f64::from(request.installment_count);
    amounts.extend(std::iter::repeat((per_installment, false)).take(count));
    amounts
}

/// Rounds to `digits` decimals with the remainder on the final installment. `None`
/// when a scaled amount does not fit in an `i64`.
fn minor_unit_amounts(request: &PlanRequest, digits: u8) -> Option<Vec<(f64, bool)>> {
    let count = request.installment_count as usize;
    let has_deposit = request.has_deposit();
    let scale = 10f64.powi(i32::from(digits.min(MAX_MINOR_UNIT_DIGITS)));

    let deposit_minor = if has_deposit {
        to_minor(request.deposit_amount, scale)?
    } else {
        0
    };
    let remaining = to_minor(request.total_amount, scale)?.checked_sub(deposit_minor)?;

    let mut amounts = Vec::with_capacity(count + usize::from(has_deposit));
    if has_deposit {
        amounts.push((deposit_minor as f64 / scale, true));
    }
    let installments = i64::from(request.installment_count);
    let base = remaining.div_euclid(installments);
    let remainder = remaining - base * installments;
    for position in 0..count {
        let minor = if position + 1 == count {
            base + remainder
        } else {
            base
        };
        amounts.push((minor as f64 / scale, false));
    }
    Some(amounts)
}

fn to_minor(amount: f64, scale: f64) -> Option<i64> {
    let scaled = (amount * scale).round();
    // i64::MAX is not representable as f64; the cast rounds it up to 2^63.
    (scaled.is_finite() && scaled.abs() < i64::MAX as f64).then(|| scaled as i64)
}

/// Builds a plan with [`AmountPrecision::Exact`] and no validation.
pub fn generate(request: &PlanRequest) -> Plan {
    ScheduleGenerator::default().generate(request)
}

/// Builds a plan with [`AmountPrecision::Exact`], rejecting nonsensical inputs.
pub fn generate_checked(request: &PlanRequest) -> Result<Plan, PlanError> {
    ScheduleGenerator::default().generate_checked(request)
}

/// Checks the request for inputs that would produce a meaningless plan.
///
/// A zero total or zero installment count is accepted; it describes the empty plan.
pub fn validate(request: &PlanRequest) -> Result<(), PlanError> {
    for (field, value) in [
        ("total amount", request.total_amount),
        ("deposit amount", request.deposit_amount),
    ] {
        if !value.is_finite() {
            return Err(PlanError::NonFiniteAmount { field });
        }
        if value < 0.0 {
            return Err(PlanError::NegativeAmount { field, value });
        }
    }
    if request.deposit_amount > request.total_amount {
        return Err(PlanError::DepositExceedsTotal {
            deposit: request.deposit_amount,
            total: request.total_amount,
        });
    }
    if request.interval_count == 0 {
        return Err(PlanError::ZeroIntervalCount);
    }
    if request.installment_count > MAX_INSTALLMENTS {
        return Err(PlanError::TooManyInstallments {
            max: MAX_INSTALLMENTS,
        });
    }
    Ok(())
}
