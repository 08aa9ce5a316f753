mod common;

use std::cell::RefCell;

use common::request_on;
use installment_core::checkout::{
    can_submit, submit, PayerDetails, PaymentToken, PaymentTokenizer, PlanRegistrar,
    PlanRegistration, RegistrationCredentials, RegistrationReceipt, SourceOwner,
};
use installment_core::errors::CheckoutError;
use installment_core::schedule::{generate, Plan, TimeUnit};

struct StubTokenizer {
    result: Result<&'static str, &'static str>,
    seen: RefCell<Vec<SourceOwner>>,
}

impl StubTokenizer {
    fn ok(token: &'static str) -> Self {
        Self {
            result: Ok(token),
            seen: RefCell::new(Vec::new()),
        }
    }

    fn failing(message: &'static str) -> Self {
        Self {
            result: Err(message),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl PaymentTokenizer for StubTokenizer {
    fn create_source(&self, owner: &SourceOwner) -> Result<PaymentToken, CheckoutError> {
        self.seen.borrow_mut().push(owner.clone());
        self.result
            .map(|token| PaymentToken(token.to_string()))
            .map_err(|message| CheckoutError::Tokenization(message.to_string()))
    }
}

#[derive(Default)]
struct RecordingRegistrar {
    fail: bool,
    calls: RefCell<Vec<(PlanRegistration, RegistrationCredentials)>>,
}

impl PlanRegistrar for RecordingRegistrar {
    fn register(
        &self,
        registration: &PlanRegistration,
        credentials: &RegistrationCredentials,
    ) -> Result<RegistrationReceipt, CheckoutError> {
        self.calls
            .borrow_mut()
            .push((registration.clone(), credentials.clone()));
        if self.fail {
            return Err(CheckoutError::Registration("503 Service Unavailable".into()));
        }
        Ok(RegistrationReceipt {
            reference: "plan_001".into(),
        })
    }
}

fn plan() -> Plan {
    generate(
        &request_on(2024, 1, 1)
            .with_total(1200.0)
            .with_deposit(200.0)
            .with_installments(5),
    )
}

fn payer() -> PayerDetails {
    PayerDetails::new("John", "Malkovich", "john@example.com")
}

fn credentials() -> RegistrationCredentials {
    RegistrationCredentials {
        api_key: "sk_test".into(),
        idempotency_key: "order-1".into(),
    }
}

#[test]
fn gating_requires_payer_and_charges() {
    assert!(can_submit(&payer(), &plan()));
    assert!(!can_submit(&payer(), &Plan::empty(TimeUnit::Month, 1)));
    assert!(!can_submit(&PayerDetails::new("John", "", "john@example.com"), &plan()));
}

#[test]
fn successful_submission_tokenizes_then_registers() {
    let tokenizer = StubTokenizer::ok("src_123");
    let registrar = RecordingRegistrar::default();

    let receipt = submit(&payer(), &plan(), &tokenizer, &registrar, &credentials()).unwrap();

    assert_eq!(receipt.token.0, "src_123");
    assert_eq!(receipt.registration.reference, "plan_001");
    assert_eq!(tokenizer.seen.borrow()[0].name, "John Malkovich");
    let calls = registrar.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.plan, plan());
    assert_eq!(calls[0].1.idempotency_key, "order-1");
}

#[test]
fn tokenization_failure_skips_registration() {
    let tokenizer = StubTokenizer::failing("Your card number is incomplete.");
    let registrar = RecordingRegistrar::default();

    let err = submit(&payer(), &plan(), &tokenizer, &registrar, &credentials()).unwrap_err();

    assert!(matches!(err, CheckoutError::Tokenization(_)));
    assert_eq!(err.to_string(), "Tokenization failed: Your card number is incomplete.");
    assert!(registrar.calls.borrow().is_empty());
}

#[test]
fn registration_failure_is_not_retried() {
    let tokenizer = StubTokenizer::ok("src_123");
    let registrar = RecordingRegistrar {
        fail: true,
        ..RecordingRegistrar::default()
    };

    let err = submit(&payer(), &plan(), &tokenizer, &registrar, &credentials()).unwrap_err();

    assert!(matches!(err, CheckoutError::Registration(_)));
    assert_eq!(registrar.calls.borrow().len(), 1);
}

#[test]
fn incomplete_checkout_never_reaches_collaborators() {
    let tokenizer = StubTokenizer::ok("src_123");
    let registrar = RecordingRegistrar::default();

    let err = submit(
        &PayerDetails::new("", "Malkovich", ""),
        &plan(),
        &tokenizer,
        &registrar,
        &credentials(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Checkout is not ready: missing first name, email");

    let err = submit(
        &payer(),
        &Plan::empty(TimeUnit::Month, 1),
        &tokenizer,
        &registrar,
        &credentials(),
    )
    .unwrap_err();
    assert!(matches!(err, CheckoutError::NotReady(_)));
    assert!(tokenizer.seen.borrow().is_empty());
}

#[test]
fn registration_payload_serializes_plan_shape() {
    let registration = PlanRegistration {
        token: PaymentToken("src_123".into()),
        owner: SourceOwner::from(&payer()),
        plan: plan(),
    };
    let json = serde_json::to_value(&registration).unwrap();
    assert_eq!(json["token"], "src_123");
    assert_eq!(json["plan"]["hasDeposit"], true);
    assert_eq!(json["plan"]["items"].as_array().unwrap().len(), 6);
}
