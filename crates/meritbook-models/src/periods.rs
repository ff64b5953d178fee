//! Academic period types: semesters, years, and their parsing rules.
//!
//! A period is a semester slot plus a single base year, rendered as
//! `hoc_ky_1_2025`. Historic data used a dash separator and occasionally no
//! separator at all, so [`AcademicPeriod::parse`] accepts all three spellings
//! of the combined value. The year itself is stricter: stored data was
//! migrated from `"YYYY-YYYY"` ranges to a single 4-digit year, and
//! [`AcademicYear`] only accepts the migrated form. Callers holding a range
//! get an error, never a silent repair.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Format violations in semester/year values supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodFormatError {
    #[error("semester `{0}` is not recognized (expected hoc_ky_1 or hoc_ky_2)")]
    UnknownSemester(String),
    #[error("academic year `{0}` must be a single 4-digit year")]
    InvalidYear(String),
    #[error("period `{0}` is not recognized (expected hoc_ky_<n>_<yyyy>)")]
    UnparseablePeriod(String),
}

/// One of the two semester slots in an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Semester {
    #[serde(rename = "hoc_ky_1")]
    HocKy1,
    #[serde(rename = "hoc_ky_2")]
    HocKy2,
}

impl Semester {
    pub fn as_str(&self) -> &'static str {
        match self {
            Semester::HocKy1 => "hoc_ky_1",
            Semester::HocKy2 => "hoc_ky_2",
        }
    }

    /// Short label used in storage keys and operator-facing messages.
    pub fn short_label(&self) -> &'static str {
        match self {
            Semester::HocKy1 => "HK1",
            Semester::HocKy2 => "HK2",
        }
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            Semester::HocKy1 => 1,
            Semester::HocKy2 => 2,
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Semester {
    type Err = PeriodFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "hoc_ky_1" => Ok(Semester::HocKy1),
            "hoc_ky_2" => Ok(Semester::HocKy2),
            other => Err(PeriodFormatError::UnknownSemester(other.to_string())),
        }
    }
}

/// A single base year in the canonical post-migration format.
///
/// Invariant: always exactly four ASCII digits. Legacy `"2024-2025"` range
/// values are rejected; normalizing them was a one-time data migration and
/// is not re-attempted here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[schema(value_type = String, example = "2025")]
pub struct AcademicYear(String);

impl AcademicYear {
    pub fn new(raw: &str) -> Result<Self, PeriodFormatError> {
        let trimmed = raw.trim();
        if trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(PeriodFormatError::InvalidYear(raw.to_string()))
        }
    }

    pub fn from_number(year: i32) -> Self {
        Self(format!("{year:04}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AcademicYear {
    type Err = PeriodFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for AcademicYear {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        AcademicYear::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// A semester slot in a specific academic year, e.g. `hoc_ky_1` / `2025`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct AcademicPeriod {
    pub hoc_ky: Semester,
    pub nam_hoc: AcademicYear,
}

impl AcademicPeriod {
    pub fn new(hoc_ky: Semester, nam_hoc: AcademicYear) -> Self {
        Self { hoc_ky, nam_hoc }
    }

    /// Build a period from the raw request fields, validating both.
    pub fn from_parts(hoc_ky: &str, nam_hoc: &str) -> Result<Self, PeriodFormatError> {
        Ok(Self {
            hoc_ky: hoc_ky.parse()?,
            nam_hoc: AcademicYear::new(nam_hoc)?,
        })
    }

    /// Parse a combined period value.
    ///
    /// Accepts the canonical `hoc_ky_1_2025` as well as the legacy dash
    /// (`hoc_ky_1-2025`) and compact (`hoc_ky_12025`) spellings still found
    /// in older records.
    pub fn parse(value: &str) -> Result<Self, PeriodFormatError> {
        let trimmed = value.trim();
        let rest = trimmed
            .strip_prefix("hoc_ky_")
            .ok_or_else(|| PeriodFormatError::UnparseablePeriod(value.to_string()))?;

        let mut chars = rest.chars();
        let slot = chars.next();
        let tail: String = chars.collect();
        let year = match tail.strip_prefix(['_', '-']) {
            Some(y) => y,
            None => tail.as_str(),
        };

        let hoc_ky = match slot {
            Some('1') => Semester::HocKy1,
            Some('2') => Semester::HocKy2,
            _ => return Err(PeriodFormatError::UnparseablePeriod(value.to_string())),
        };
        let nam_hoc = AcademicYear::new(year)
            .map_err(|_| PeriodFormatError::UnparseablePeriod(value.to_string()))?;

        Ok(Self { hoc_ky, nam_hoc })
    }

    /// Determine the period a date falls into.
    ///
    /// July through November is semester 1 of that year, December is
    /// semester 2 of that year, January through April is semester 2 of the
    /// previous year, and the May/June break defaults to semester 1.
    pub fn from_date(date: NaiveDate) -> Self {
        let month = date.month();
        let year = date.year();

        let (hoc_ky, base_year) = match month {
            7..=11 => (Semester::HocKy1, year),
            12 => (Semester::HocKy2, year),
            1..=4 => (Semester::HocKy2, year - 1),
            _ => (Semester::HocKy1, year),
        };

        Self {
            hoc_ky,
            nam_hoc: AcademicYear::from_number(base_year),
        }
    }

    /// Compact key used for lock-store directories and denial messages,
    /// e.g. `HK1_2025`.
    pub fn storage_key(&self) -> String {
        format!("{}_{}", self.hoc_ky.short_label(), self.nam_hoc)
    }
}

impl fmt::Display for AcademicPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.hoc_ky, self.nam_hoc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_and_legacy_spellings() {
        for value in ["hoc_ky_1_2025", "hoc_ky_1-2025", "hoc_ky_12025"] {
            let period = AcademicPeriod::parse(value).unwrap();
            assert_eq!(period.hoc_ky, Semester::HocKy1);
            assert_eq!(period.nam_hoc.as_str(), "2025");
        }
        let period = AcademicPeriod::parse("hoc_ky_2_2024").unwrap();
        assert_eq!(period.hoc_ky, Semester::HocKy2);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for value in ["hk1_2025", "hoc_ky_3_2025", "hoc_ky_1_25", "hoc_ky_1_", ""] {
            assert!(AcademicPeriod::parse(value).is_err(), "{value}");
        }
    }

    #[test]
    fn test_year_rejects_range_format() {
        assert!(AcademicYear::new("2024-2025").is_err());
        assert!(AcademicYear::new("24").is_err());
        assert!(AcademicYear::new("year").is_err());
        assert_eq!(AcademicYear::new(" 2025 ").unwrap().as_str(), "2025");
    }

    #[test]
    fn test_from_parts_reports_which_field_failed() {
        let err = AcademicPeriod::from_parts("hoc_ky_9", "2025").unwrap_err();
        assert!(matches!(err, PeriodFormatError::UnknownSemester(_)));

        let err = AcademicPeriod::from_parts("hoc_ky_1", "2024-2025").unwrap_err();
        assert!(matches!(err, PeriodFormatError::InvalidYear(_)));
    }

    #[test]
    fn test_from_date_boundaries() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

        assert_eq!(
            AcademicPeriod::from_date(date(2025, 7, 1)).to_string(),
            "hoc_ky_1_2025"
        );
        assert_eq!(
            AcademicPeriod::from_date(date(2025, 11, 30)).to_string(),
            "hoc_ky_1_2025"
        );
        assert_eq!(
            AcademicPeriod::from_date(date(2025, 12, 15)).to_string(),
            "hoc_ky_2_2025"
        );
        assert_eq!(
            AcademicPeriod::from_date(date(2026, 1, 10)).to_string(),
            "hoc_ky_2_2025"
        );
        assert_eq!(
            AcademicPeriod::from_date(date(2026, 4, 30)).to_string(),
            "hoc_ky_2_2025"
        );
        // summer break defaults to the upcoming first semester
        assert_eq!(
            AcademicPeriod::from_date(date(2026, 5, 20)).to_string(),
            "hoc_ky_1_2026"
        );
    }

    #[test]
    fn test_storage_key() {
        let period = AcademicPeriod::parse("hoc_ky_2_2025").unwrap();
        assert_eq!(period.storage_key(), "HK2_2025");
        assert_eq!(period.hoc_ky.ordinal(), 2);
    }

    #[test]
    fn test_serde_uses_domain_field_names() {
        let period = AcademicPeriod::parse("hoc_ky_1_2025").unwrap();
        let json = serde_json::to_value(&period).unwrap();
        assert_eq!(json["hoc_ky"], "hoc_ky_1");
        assert_eq!(json["nam_hoc"], "2025");

        let back: AcademicPeriod = serde_json::from_value(json).unwrap();
        assert_eq!(back, period);
    }

    #[test]
    fn test_deserialize_rejects_range_year() {
        let err = serde_json::from_value::<AcademicPeriod>(serde_json::json!({
            "hoc_ky": "hoc_ky_1",
            "nam_hoc": "2024-2025",
        }));
        assert!(err.is_err());
    }
}
