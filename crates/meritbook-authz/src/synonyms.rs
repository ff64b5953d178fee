//! Data-driven synonym fallback for permission matching.
//!
//! Stored permission sets predate the current naming convention in places,
//! so a required permission may be satisfied by an older spelling. The
//! matcher never guesses (no pluralization heuristics); every fallback is an
//! explicit table entry, and extending the table is a data change only.
//!
//! Three kinds of entries exist, all observed in production data:
//!
//! - **noun pairs** (symmetric): `notification` ↔ `notifications`;
//! - **action fallbacks** (one-way): requiring `<noun>.read` accepts a
//!   stored `<noun>.view`;
//! - **literal equivalences** (one-way): requiring `registrations.write`
//!   accepts a stored `registrations.register`.

/// Lookup table of accepted alternate spellings.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    /// Interchangeable noun forms, checked in both directions.
    noun_pairs: Vec<(String, String)>,
    /// `(required_action, stored_alias)`: a requirement for the first action
    /// is satisfied by a stored permission with the second.
    action_fallbacks: Vec<(String, String)>,
    /// `(required_permission, stored_alias)` full-string equivalences.
    equivalents: Vec<(String, String)>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self {
            noun_pairs: vec![(String::from("notification"), String::from("notifications"))],
            action_fallbacks: vec![(String::from("read"), String::from("view"))],
            equivalents: vec![(
                String::from("registrations.write"),
                String::from("registrations.register"),
            )],
        }
    }
}

impl SynonymTable {
    /// An empty table: exact matching only.
    pub fn empty() -> Self {
        Self {
            noun_pairs: Vec::new(),
            action_fallbacks: Vec::new(),
            equivalents: Vec::new(),
        }
    }

    pub fn with_noun_pair(mut self, a: &str, b: &str) -> Self {
        self.noun_pairs.push((a.to_lowercase(), b.to_lowercase()));
        self
    }

    pub fn with_action_fallback(mut self, required: &str, stored: &str) -> Self {
        self.action_fallbacks
            .push((required.to_lowercase(), stored.to_lowercase()));
        self
    }

    pub fn with_equivalent(mut self, required: &str, stored: &str) -> Self {
        self.equivalents
            .push((required.to_lowercase(), stored.to_lowercase()));
        self
    }

    /// Alternate spellings that would satisfy `required`.
    ///
    /// `required` must already be canonical (trimmed, lower-cased).
    pub fn alternates(&self, required: &str) -> Vec<String> {
        let mut out = Vec::new();

        if let Some((noun, action)) = required.split_once('.') {
            for (a, b) in &self.noun_pairs {
                if noun == a {
                    out.push(format!("{b}.{action}"));
                } else if noun == b {
                    out.push(format!("{a}.{action}"));
                }
            }
            for (required_action, stored_alias) in &self.action_fallbacks {
                if action == required_action {
                    out.push(format!("{noun}.{stored_alias}"));
                }
            }
        }

        for (required_permission, stored_alias) in &self.equivalents {
            if required == required_permission {
                out.push(stored_alias.clone());
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noun_pairs_are_symmetric() {
        let table = SynonymTable::default();
        assert!(
            table
                .alternates("notifications.write")
                .contains(&"notification.write".to_string())
        );
        assert!(
            table
                .alternates("notification.write")
                .contains(&"notifications.write".to_string())
        );
    }

    #[test]
    fn test_action_fallback_is_one_way() {
        let table = SynonymTable::default();
        assert!(
            table
                .alternates("attendance.read")
                .contains(&"attendance.view".to_string())
        );
        assert!(table.alternates("attendance.view").is_empty());
    }

    #[test]
    fn test_equivalents_match_full_string_only() {
        let table = SynonymTable::default();
        assert!(
            table
                .alternates("registrations.write")
                .contains(&"registrations.register".to_string())
        );
        assert!(
            !table
                .alternates("registrations.delete")
                .contains(&"registrations.register".to_string())
        );
    }

    #[test]
    fn test_extending_is_data_only() {
        let table = SynonymTable::empty()
            .with_noun_pair("report", "reports")
            .with_action_fallback("delete", "remove")
            .with_equivalent("scores.read", "points.read");

        assert!(
            table
                .alternates("report.export")
                .contains(&"reports.export".to_string())
        );
        assert!(
            table
                .alternates("scores.delete")
                .contains(&"scores.remove".to_string())
        );
        assert!(
            table
                .alternates("scores.read")
                .contains(&"points.read".to_string())
        );
    }

    #[test]
    fn test_permission_without_dot_only_checks_equivalents() {
        let table = SynonymTable::default().with_equivalent("manage", "system.manage");
        assert_eq!(table.alternates("manage"), vec!["system.manage"]);
    }
}
