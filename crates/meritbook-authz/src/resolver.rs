//! Raw permission payload classification and the canonical permission set.
//!
//! Four storage shapes exist in the wild:
//!
//! 1. a plain array of strings (the canonical shape going forward),
//! 2. a JSON-encoded string containing one of the other shapes,
//! 3. a keyed object whose values are the permissions,
//! 4. a nested object carrying a `permissions` array.
//!
//! The shape decision happens exactly once, at the storage boundary, by
//! converting the stored `serde_json::Value` into a [`RawPermissions`]
//! variant. Normalization is total: any input, including null or garbage
//! text, produces a valid (possibly empty) set. Authorization must never
//! hard-fail because of legacy data.

use crate::synonyms::SynonymTable;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// A role's stored permission payload, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPermissions {
    /// A JSON array; elements may or may not be strings.
    Sequence(Vec<Value>),
    /// Textual payload, expected to be JSON-encoded.
    Text(String),
    /// A keyed object; either the nested legacy shape or a key→permission map.
    Map(serde_json::Map<String, Value>),
    /// Null or any unrecognized type.
    Missing,
}

impl From<Value> for RawPermissions {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => RawPermissions::Sequence(items),
            Value::String(text) => RawPermissions::Text(text),
            Value::Object(map) => RawPermissions::Map(map),
            _ => RawPermissions::Missing,
        }
    }
}

impl From<Option<Value>> for RawPermissions {
    fn from(value: Option<Value>) -> Self {
        value.map(RawPermissions::from).unwrap_or(RawPermissions::Missing)
    }
}

/// Canonical form of a single permission string: trimmed and lower-cased.
/// Empty results are discarded.
fn canonical(raw: &str) -> Option<String> {
    let normalized = raw.trim().to_lowercase();
    (!normalized.is_empty()).then_some(normalized)
}

/// A deduplicated set of canonical permission strings.
///
/// Backed by a `BTreeSet`, so iteration (and therefore display) is always
/// ascending; order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    /// Normalize a stored payload into the canonical set. Total: never fails.
    pub fn normalize(raw: RawPermissions) -> Self {
        let values = match raw {
            RawPermissions::Text(text) => {
                return match serde_json::from_str::<Value>(&text) {
                    // re-classify what the text contained; a decoded array or
                    // object goes through the rules below
                    Ok(decoded) => Self::normalize(RawPermissions::from(decoded)),
                    Err(_) => Self::default(),
                };
            }
            RawPermissions::Sequence(items) => items,
            RawPermissions::Map(mut map) => match map.remove("permissions") {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    // `permissions` key of the wrong type: fall back to the
                    // key→permission interpretation, that value included
                    let mut values: Vec<Value> = map.into_iter().map(|(_, v)| v).collect();
                    values.push(other);
                    values
                }
                None => map.into_iter().map(|(_, v)| v).collect(),
            },
            RawPermissions::Missing => return Self::default(),
        };

        values
            .iter()
            .filter_map(Value::as_str)
            .filter_map(canonical)
            .collect()
    }

    /// Build a set from already-canonical-ish strings (seeds, admin input).
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| canonical(name.as_ref()))
            .collect()
    }

    /// Whether the set grants `required`, either exactly or through one of
    /// the synonym table's alternates.
    ///
    /// Pure and allocation-light; safe to call on every request.
    pub fn allows(&self, synonyms: &SynonymTable, required: &str) -> bool {
        let Some(required) = canonical(required) else {
            return false;
        };
        if self.0.contains(&required) {
            return true;
        }
        synonyms
            .alternates(&required)
            .iter()
            .any(|alternate| self.0.contains(alternate))
    }

    /// Exact membership, no synonym fallback.
    pub fn contains(&self, permission: &str) -> bool {
        match canonical(permission) {
            Some(p) => self.0.contains(&p),
            None => false,
        }
    }

    /// Add a permission. Idempotent: granting an already-held permission
    /// leaves the set unchanged.
    pub fn grant(&mut self, permission: &str) {
        if let Some(p) = canonical(permission) {
            self.0.insert(p);
        }
    }

    /// Remove the literal permission (case-insensitively).
    ///
    /// Deliberately no synonym expansion: revoking `notifications.write`
    /// must not also strip a distinct `notification.write` entry.
    pub fn revoke(&mut self, permission: &str) {
        if let Some(p) = canonical(permission) {
            self.0.remove(&p);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The canonical array shape written back to storage, ascending.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
