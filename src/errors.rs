use thiserror::Error;

/// Failures raised while assembling a request or generating a checked plan.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NonFiniteAmount { field: &'static str },
    #[error("deposit {deposit} exceeds total amount {total}")]
    DepositExceedsTotal { deposit: f64, total: f64 },
    #[error("interval count must be at least 1")]
    ZeroIntervalCount,
    #[error("installment count must not exceed {max}")]
    TooManyInstallments { max: u32 },
    #[error("amounts are too large to round to {digits} decimal places")]
    AmountOutOfRange { digits: u8 },
    #[error("due date for charge {index} falls outside the supported calendar range")]
    DateOutOfRange { index: u32 },
    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Errors raised while loading or storing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Errors surfaced by the checkout flow. Either step failing ends the flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Checkout is not ready: {0}")]
    NotReady(String),
    #[error("Tokenization failed: {0}")]
    Tokenization(String),
    #[error("Registration failed: {0}")]
    Registration(String),
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}
