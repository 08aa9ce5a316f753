#![doc(test(attr(deny(warnings))))]

//! Installment Core builds payment-plan schedules: given a total, an optional
//! deposit, an installment count, and a billing cadence, it produces the dated
//! charges a payer will see, plus the presentation and checkout plumbing around them.
//!
//! ```
//! use chrono::NaiveDate;
//! use installment_core::schedule::{generate, PlanRequest};
//!
//! let request = PlanRequest::starting_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
//!     .with_total(1200.0)
//!     .with_deposit(200.0)
//!     .with_installments(5);
//! let plan = generate(&request);
//! assert_eq!(plan.len(), 6);
//! assert!(plan.items[0].is_deposit);
//! ```

pub mod checkout;
pub mod cli;
pub mod config;
pub mod errors;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod render;
pub mod schedule;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Installment Core tracing initialized.");
    });
}
