//! Proptest generators for credential data.
//!
//! Names and values stay inside the cookie-safe alphabet (no `;` or
//! whitespace, no `=` in names) so serialization round-trips hold by
//! construction.

use proptest::prelude::*;

use credrelay_core::CredentialRecord;

/// Cookie-safe credential names.
pub fn credential_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

/// Cookie-safe credential values (may contain `=`).
pub fn credential_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_=-]{0,16}"
}

/// Domains drawn from the test platforms plus an unclassified one.
pub fn credential_domain() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(".p1.example".to_string()),
        Just("sub.p1.example".to_string()),
        Just(".p2.example".to_string()),
        Just(".unrelated.example".to_string()),
    ]
}

/// A single credential record.
pub fn credential_record() -> impl Strategy<Value = CredentialRecord> {
    (credential_name(), credential_value(), credential_domain())
        .prop_map(|(name, value, domain)| CredentialRecord::new(name, value, domain))
}

/// Up to `max` records, duplicates (by key) included on purpose.
pub fn credential_records(max: usize) -> impl Strategy<Value = Vec<CredentialRecord>> {
    prop::collection::vec(credential_record(), 0..max)
}
