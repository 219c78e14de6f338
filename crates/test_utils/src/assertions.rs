//! Custom Test Assertions
//!
//! Assertion helpers that print domain values in the failure message.

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt::Debug;

use core_kernel::Money;

/// Asserts that a Money value equals an exact decimal amount
pub fn assert_money_eq(actual: Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Money mismatch: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that parts sum to the total
pub fn assert_money_sum_equals(parts: &[Money], total: Money) {
    let sum = Money::checked_sum(parts.iter().copied()).expect("parts overflow");
    assert_eq!(
        sum, total,
        "Sum of parts ({}) does not equal total ({})",
        sum, total
    );
}

/// Asserts that a slice is ordered according to `compare`
///
/// # Panics
///
/// Panics naming the first adjacent pair that is out of order
pub fn assert_sorted_by<T, F>(items: &[T], compare: F)
where
    T: Debug,
    F: Fn(&T, &T) -> Ordering,
{
    for (i, pair) in items.windows(2).enumerate() {
        assert_ne!(
            compare(&pair[0], &pair[1]),
            Ordering::Greater,
            "Items {} and {} out of order: {:?} then {:?}",
            i,
            i + 1,
            pair[0],
            pair[1]
        );
    }
}
