//! Installment schedule generation: cadence arithmetic, plan requests, and the generator.

pub mod clock;
pub mod generator;
pub mod interval;
pub mod plan;
pub mod request;

pub use clock::{Clock, FixedClock, SystemClock};
pub use generator::{generate, generate_checked, validate, AmountPrecision, ScheduleGenerator};
pub use interval::{TimeInterval, TimeUnit};
pub use plan::{Plan, ScheduledCharge};
pub use request::{PlanField, PlanRequest, MAX_INSTALLMENTS};
