//! Submission gating and the two external collaborators of a checkout: the card
//! tokenizer and the plan-registration endpoint.

use serde::{Deserialize, Serialize};

use crate::errors::CheckoutError;
use crate::schedule::Plan;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl PayerDetails {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Names of the fields that are still blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Submission is allowed once every payer field is filled in and the plan has charges.
pub fn can_submit(payer: &PayerDetails, plan: &Plan) -> bool {
    payer.is_complete() && !plan.is_empty()
}

/// Owner data handed to the tokenizer alongside the card element it already holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOwner {
    pub name: String,
    pub email: String,
}

impl From<&PayerDetails> for SourceOwner {
    fn from(payer: &PayerDetails) -> Self {
        Self {
            name: payer.full_name(),
            email: payer.email.trim().to_string(),
        }
    }
}

/// Opaque, single-use reference to tokenized card details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentToken(pub String);

pub trait PaymentTokenizer {
    fn create_source(&self, owner: &SourceOwner) -> Result<PaymentToken, CheckoutError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCredentials {
    pub api_key: String,
    pub idempotency_key: String,
}

/// Payload sent to the plan-registration endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRegistration {
    pub token: PaymentToken,
    pub owner: SourceOwner,
    pub plan: Plan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationReceipt {
    pub reference: String,
}

pub trait PlanRegistrar {
    fn register(
        &self,
        registration: &PlanRegistration,
        credentials: &RegistrationCredentials,
    ) -> Result<RegistrationReceipt, CheckoutError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub token: PaymentToken,
    pub registration: RegistrationReceipt,
}

/// Tokenizes the card and registers the plan, in that order. Either failure ends the
/// flow; nothing is retried and nothing is rolled back.
pub fn submit(
    payer: &PayerDetails,
    plan: &Plan,
    tokenizer: &dyn PaymentTokenizer,
    registrar: &dyn PlanRegistrar,
    credentials: &RegistrationCredentials,
) -> Result<CheckoutReceipt, CheckoutError> {
    if plan.is_empty() {
        return Err(CheckoutError::NotReady("the plan has no charges".into()));
    }
    let missing = payer.missing_fields();
    if !missing.is_empty() {
        return Err(CheckoutError::NotReady(format!(
            "missing {}",
            missing.join(", ")
        )));
    }

    let owner = SourceOwner::from(payer);
    let token = tokenizer.create_source(&owner)?;
    tracing::info!(charges = plan.len(), "card tokenized; registering plan");

    let registration = PlanRegistration {
        token: token.clone(),
        owner,
        plan: plan.clone(),
    };
    let receipt = registrar.register(&registration, credentials)?;
    tracing::info!(reference = %receipt.reference, "plan registered");

    Ok(CheckoutReceipt {
        token,
        registration: receipt,
    })
}
