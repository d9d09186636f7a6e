//! GS1 barcode handling for scanned DOC numbers.
//!
//! Badge scanners hand us a 12-digit GTIN whose last digit is a mod-10
//! check digit and whose first digit is a program prefix. Keyboard entry
//! hands us a bare 5- or 6-digit DOC number. Anything else is rejected so
//! the operator re-scans instead of us silently truncating.

use crate::errors::ServiceError;

/// Validates the GS1 mod-10 check digit of a GTIN string.
///
/// Leading zeros are stripped first (they do not affect the checksum). The
/// remaining digits, minus the final check digit, are reversed and weighted
/// 3, 1, 3, 1, ... starting from the rightmost digit; the check digit must
/// equal `(10 - sum % 10) % 10`.
pub fn check_digit_is_valid(gtin: &str) -> bool {
    let gtin = gtin.trim_start_matches('0');

    if gtin.is_empty() || !gtin.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = gtin.bytes().map(|b| u32::from(b - b'0')).collect();
    let (check, body) = match digits.split_last() {
        Some(split) => split,
        None => return false,
    };

    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();

    (10 - sum % 10) % 10 == *check
}

/// Extracts the DOC number from a validated 12-digit GTIN barcode: the
/// leading prefix digit and trailing check digit are stripped and leading
/// zeros removed.
pub fn doc_number_from_barcode(gtin: &str) -> Result<String, ServiceError> {
    if !check_digit_is_valid(gtin) {
        return Err(ServiceError::InvalidBarcode(gtin.to_string()));
    }

    Ok(gtin[1..gtin.len() - 1].trim_start_matches('0').to_string())
}

/// Normalizes operator input into a DOC number.
///
/// A 5- or 6-digit entry is taken as a DOC number typed at the keyboard; a
/// 12-digit entry is treated as a GTIN scan and checksum-validated. Other
/// lengths are rejected outright.
pub fn doc_number_from_scan(input: &str) -> Result<String, ServiceError> {
    match input.len() {
        5 | 6 => {
            if !input.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ServiceError::InvalidInput(format!(
                    "DOC number '{input}' must be numeric"
                )));
            }
            Ok(input.to_string())
        }
        12 => doc_number_from_barcode(input),
        _ => Err(ServiceError::InvalidInput(format!(
            "'{input}' is not a DOC number or GTIN barcode"
        ))),
    }
}

/// Computes the mod-10 check digit for a digit string (no check digit yet).
/// Exposed for label generation and tests.
pub fn compute_check_digit(body: &str) -> Option<u32> {
    let body = body.trim_start_matches('0');
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let sum: u32 = body
        .bytes()
        .map(|b| u32::from(b - b'0'))
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { d })
        .sum();

    Some((10 - sum % 10) % 10)
}
