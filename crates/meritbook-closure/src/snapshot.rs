//! Pre-lock data snapshot.
//!
//! Before a class semester is soft-locked, the activities and registrations
//! it covers are captured and hashed. The checksum is stored on the closure
//! record so a later dispute ("this registration changed after the lock")
//! can be settled against the captured payload.

use chrono::{DateTime, Utc};
use meritbook_models::{AcademicYear, ActivityId, ClassId, Registration, Semester};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Activity row as captured at lock time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotActivity {
    pub id: ActivityId,
    pub name: String,
    /// Conduct points awarded by the activity.
    pub points: f64,
}

/// Everything the lock covers for one class and period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureSnapshot {
    pub class_id: ClassId,
    pub hoc_ky: Semester,
    pub nam_hoc: AcademicYear,
    pub activities: Vec<SnapshotActivity>,
    pub registrations: Vec<Registration>,
    pub generated_at: DateTime<Utc>,
}

impl ClosureSnapshot {
    /// SHA-256 over the serialized payload, hex-encoded.
    pub fn checksum(&self) -> String {
        let payload = serde_json::to_vec(self).expect("snapshot serialization cannot fail");
        let digest = Sha256::digest(&payload);
        hex::encode(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meritbook_models::AcademicPeriod;

    fn snapshot(points: f64) -> ClosureSnapshot {
        let period = AcademicPeriod::parse("hoc_ky_1_2025").unwrap();
        ClosureSnapshot {
            class_id: ClassId::from_u128(1),
            hoc_ky: period.hoc_ky,
            nam_hoc: period.nam_hoc,
            activities: vec![SnapshotActivity {
                id: ActivityId::from_u128(2),
                name: "Hiến máu nhân đạo".to_string(),
                points,
            }],
            registrations: vec![],
            generated_at: DateTime::from_timestamp(1_750_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn test_checksum_is_stable_for_equal_payloads() {
        assert_eq!(snapshot(5.0).checksum(), snapshot(5.0).checksum());
    }

    #[test]
    fn test_checksum_changes_with_payload() {
        assert_ne!(snapshot(5.0).checksum(), snapshot(10.0).checksum());
    }

    #[test]
    fn test_checksum_is_hex_sha256() {
        let checksum = snapshot(5.0).checksum();
        assert_eq!(checksum.len(), 64);
        assert!(checksum.bytes().all(|b| b.is_ascii_hexdigit()));
    }
}
