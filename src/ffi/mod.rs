//! C ABI over the schedule generator. Requests and plans cross the boundary as
//! JSON strings so bindings need no struct layout knowledge.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::sync::OnceLock;

use serde_json::json;

use crate::errors::PlanError;
use crate::schedule::{generate_checked, PlanRequest};

/// Semantic version of the Rust core (mirrors `Cargo.toml`).
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Semantic version of the FFI surface. Bumps when the JSON contract changes.
pub const FFI_VERSION: &str = "0.1.0";

/// Error categories surfaced across the FFI boundary.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCategory {
    Ok = 0,
    Validation = 1,
    Encoding = 2,
}

impl From<FfiErrorCategory> for i32 {
    fn from(value: FfiErrorCategory) -> Self {
        value as i32
    }
}

pub fn classify_error(err: &PlanError) -> FfiErrorCategory {
    match err {
        PlanError::InvalidField { .. } | PlanError::UnknownField(_) => FfiErrorCategory::Encoding,
        _ => FfiErrorCategory::Validation,
    }
}

/// Returns the core semantic version as a C string owned by the library.
#[no_mangle]
pub extern "C" fn installment_core_version() -> *const c_char {
    static CORE: OnceLock<CString> = OnceLock::new();
    CORE.get_or_init(|| CString::new(CORE_VERSION).unwrap_or_default())
        .as_ptr()
}

/// Returns the FFI interface semantic version as a C string owned by the library.
#[no_mangle]
pub extern "C" fn installment_ffi_version() -> *const c_char {
    static FFI: OnceLock<CString> = OnceLock::new();
    FFI.get_or_init(|| CString::new(FFI_VERSION).unwrap_or_default())
        .as_ptr()
}

/// Generates a plan from a JSON `PlanRequest`.
///
/// Returns a newly allocated JSON string holding either the plan or
/// `{"error": {"category": .., "message": ..}}`. Release it with
/// [`installment_string_free`]. Returns null only when `request_json` is null.
///
/// # Safety
/// `request_json` must be null or point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn installment_generate_json(request_json: *const c_char) -> *mut c_char {
    if request_json.is_null() {
        return std::ptr::null_mut();
    }
    let raw = CStr::from_ptr(request_json).to_string_lossy();
    into_c_string(generate_from_json(&raw))
}

/// Frees a string returned by [`installment_generate_json`].
///
/// # Safety
/// `value` must be null or a pointer previously returned by this library and not yet freed.
#[no_mangle]
pub unsafe extern "C" fn installment_string_free(value: *mut c_char) {
    if !value.is_null() {
        drop(CString::from_raw(value));
    }
}

fn generate_from_json(raw: &str) -> String {
    let request: PlanRequest = match serde_json::from_str(raw) {
        Ok(request) => request,
        Err(err) => return error_json(FfiErrorCategory::Encoding, &err.to_string()),
    };
    match generate_checked(&request) {
        Ok(plan) => serde_json::to_string(&plan)
            .unwrap_or_else(|err| error_json(FfiErrorCategory::Encoding, &err.to_string())),
        Err(err) => error_json(classify_error(&err), &err.to_string()),
    }
}

fn error_json(category: FfiErrorCategory, message: &str) -> String {
    json!({
        "error": {
            "category": i32::from(category),
            "message": message,
        }
    })
    .to_string()
}

fn into_c_string(value: String) -> *mut c_char {
    // JSON output never contains interior NULs; fall back to an empty string regardless.
    CString::new(value).unwrap_or_default().into_raw()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn call(input: &str) -> Value {
        let input = CString::new(input).unwrap();
        unsafe {
            let output = installment_generate_json(input.as_ptr());
            assert!(!output.is_null());
            let text = CStr::from_ptr(output).to_str().unwrap().to_string();
            installment_string_free(output);
            serde_json::from_str(&text).unwrap()
        }
    }

    #[test]
    fn exposes_versions() {
        assert!(!installment_core_version().is_null());
        assert!(!installment_ffi_version().is_null());
    }

    #[test]
    fn generates_plan_json() {
        let plan = call(
            r#"{"totalAmount":1200,"depositAmount":200,"installmentCount":5,
                "interval":"month","intervalCount":1,"anchorDate":"2024-01-01"}"#,
        );
        assert_eq!(plan["items"].as_array().unwrap().len(), 6);
        assert_eq!(plan["items"][5]["dueDate"], "2024-06-01");
    }

    #[test]
    fn reports_validation_errors() {
        let result = call(
            r#"{"totalAmount":100,"depositAmount":200,"installmentCount":2,"anchorDate":"2024-01-01"}"#,
        );
        assert_eq!(result["error"]["category"], 1);
        let result = call("not json");
        assert_eq!(result["error"]["category"], 2);
    }

    #[test]
    fn rejects_unbounded_installment_count() {
        let result = call(
            r#"{"totalAmount":100,"installmentCount":4294967295,"anchorDate":"2024-01-01"}"#,
        );
        assert_eq!(result["error"]["category"], 1);
        assert_eq!(
            result["error"]["message"],
            "installment count must not exceed 1200"
        );
    }

    #[test]
    fn null_input_returns_null() {
        unsafe {
            assert!(installment_generate_json(std::ptr::null()).is_null());
        }
    }
}
