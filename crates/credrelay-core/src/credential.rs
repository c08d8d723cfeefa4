//! Credential records, bundles, and the cookie-string serialization.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::config::PlatformConfig;

/// One browser-held credential, read verbatim from the jar.
///
/// Records are never mutated; the system only reads and serializes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
}

impl CredentialRecord {
    /// Create a new record.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
        }
    }

    /// The record's uniqueness key.
    pub fn key(&self) -> CredentialKey {
        CredentialKey {
            name: self.name.clone(),
            domain: self.domain.clone(),
        }
    }
}

/// Uniqueness key for a record within a bundle: `(name, domain)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CredentialKey {
    pub name: String,
    pub domain: String,
}

/// An ordered, deduplicated snapshot of one platform's credentials.
///
/// Duplicate `(name, domain)` keys keep the last-seen value at the
/// first-seen position, so repeated collection over the same jar state
/// serializes identically. Bundles are transient; they are built per sync
/// attempt and never persisted as such.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialBundle {
    records: Vec<CredentialRecord>,
}

impl CredentialBundle {
    /// Build a bundle from raw records, deduplicating by key.
    pub fn from_records(records: impl IntoIterator<Item = CredentialRecord>) -> Self {
        let mut out: Vec<CredentialRecord> = Vec::new();
        let mut index: HashMap<CredentialKey, usize> = HashMap::new();
        for record in records {
            match index.entry(record.key()) {
                Entry::Occupied(slot) => out[*slot.get()] = record,
                Entry::Vacant(slot) => {
                    slot.insert(out.len());
                    out.push(record);
                }
            }
        }
        Self { records: out }
    }

    /// The deduplicated records in bundle order.
    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    /// Number of records in the bundle.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the bundle holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// How many of the given required names are present, by name only
    /// (domain-agnostic).
    pub fn match_count(&self, required: &[String]) -> usize {
        let names: HashSet<&str> = self.records.iter().map(|r| r.name.as_str()).collect();
        required.iter().filter(|n| names.contains(n.as_str())).count()
    }

    /// Whether the bundle carries enough of the platform's required names.
    ///
    /// A platform with zero required names trivially passes.
    pub fn is_sufficient(&self, config: &PlatformConfig) -> bool {
        if config.required.is_empty() {
            return true;
        }
        let needed = config.sufficiency.min_matches(config.required.len());
        self.match_count(&config.required) >= needed
    }

    /// Render the bundle as a cookie string: `name=value` pairs joined by
    /// `"; "`, in bundle order. Pure and deterministic.
    pub fn to_cookie_string(&self) -> String {
        self.records
            .iter()
            .map(|r| format!("{}={}", r.name, r.value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl FromIterator<CredentialRecord> for CredentialBundle {
    fn from_iter<I: IntoIterator<Item = CredentialRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

/// Split a cookie string back into `(name, value)` pairs.
///
/// Only the first `=` in each pair is significant, so values containing
/// `=` survive the round trip. Pairs without an `=` are skipped.
pub fn parse_cookie_string(cookie: &str) -> Vec<(String, String)> {
    cookie
        .split("; ")
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            pair.split_once('=')
                .map(|(name, value)| (name.to_string(), value.to_string()))
        })
        .collect()
}
