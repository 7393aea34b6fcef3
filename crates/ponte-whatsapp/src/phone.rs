// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone number normalization for the messaging network.
//!
//! Frontends submit numbers in whatever shape the operator typed them:
//! `(11) 98765-4321`, `+55 11 98765-4321`, bare digits. The network only
//! accepts fully-qualified numeric addresses, so short local numbers get the
//! country calling code prepended before being turned into a network JID.

/// Suffix addressing an individual contact on the messaging network.
const CONTACT_SUFFIX: &str = "@c.us";

/// Reduce a raw phone input to digits and qualify it with the country code.
///
/// Numbers of 11 digits or fewer that do not already carry `country_prefix`
/// get it prepended exactly once; 12 digits or more are assumed to be fully
/// qualified already and pass through unchanged.
pub fn normalize_number(raw: &str, country_prefix: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 11 && !digits.starts_with(country_prefix) {
        format!("{country_prefix}{digits}")
    } else {
        digits
    }
}

/// Canonical network address for a contact: normalized digits plus the
/// contact suffix.
pub fn canonical_jid(raw: &str, country_prefix: &str) -> String {
    format!("{}{}", normalize_number(raw, country_prefix), CONTACT_SUFFIX)
}
