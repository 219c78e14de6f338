//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::money::MoneyError;
use core_kernel::temporal::{parse_instant, TemporalError};

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_from_money_error() {
    let core_error: CoreError = MoneyError::DivisionByZero.into();
    assert!(matches!(core_error, CoreError::Money(MoneyError::DivisionByZero)));
}

#[test]
fn test_core_error_from_temporal_error() {
    let temporal = parse_instant("31/01/2024").unwrap_err();
    let core_error: CoreError = temporal.into();

    assert!(matches!(core_error, CoreError::Temporal(TemporalError::InvalidDate(_))));
    assert!(core_error.to_string().contains("31/01/2024"));
}

#[test]
fn test_core_error_configuration() {
    let error = CoreError::configuration("clinic_timezone is not a known zone");

    assert!(error.to_string().starts_with("Configuration error"));
}
