//! Configuration and result types for the structure mapper.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::SkippedField;

/// Characters ignored by [`NameMatching::Normalized`].
static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]").unwrap());

/// What to do with source fields that have no compatible destination field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Skip silently (the skip is still recorded in the report)
    #[default]
    Skip,
    /// Skip, and let the caller surface the skipped fields
    Report,
    /// Reject the whole mapping without touching the destination
    Fail,
}

impl MismatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MismatchPolicy::Skip => "skip",
            MismatchPolicy::Report => "report",
            MismatchPolicy::Fail => "fail",
        }
    }
}

impl std::str::FromStr for MismatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(MismatchPolicy::Skip),
            "report" => Ok(MismatchPolicy::Report),
            "fail" => Ok(MismatchPolicy::Fail),
            _ => Err(format!("Unknown mismatch policy: {}", s)),
        }
    }
}

impl fmt::Display for MismatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How source field names are matched against destination field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatching {
    /// Names must be identical
    #[default]
    Exact,
    /// Names are compared ignoring ASCII/Unicode case
    CaseInsensitive,
    /// Case and every non-alphanumeric character are ignored, so
    /// `CorrelationNumber` matches `correlation_number`
    Normalized,
}

impl NameMatching {
    /// Lookup key for a field name under this strategy.
    ///
    /// Returns `None` when normalization leaves nothing to compare, so names
    /// made only of punctuation never match each other.
    pub fn key(&self, name: &str) -> Option<String> {
        match self {
            NameMatching::Exact => Some(name.to_string()),
            NameMatching::CaseInsensitive => Some(name.to_lowercase()),
            NameMatching::Normalized => {
                let key = NON_ALPHANUMERIC.replace_all(name, "").to_lowercase();
                (!key.is_empty()).then_some(key)
            }
        }
    }
}

impl std::str::FromStr for NameMatching {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(NameMatching::Exact),
            "case-insensitive" | "case_insensitive" | "ignore-case" => {
                Ok(NameMatching::CaseInsensitive)
            }
            "normalized" | "normalised" => Ok(NameMatching::Normalized),
            _ => Err(format!("Unknown name matching: {}", s)),
        }
    }
}

impl fmt::Display for NameMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NameMatching::Exact => "exact",
            NameMatching::CaseInsensitive => "case-insensitive",
            NameMatching::Normalized => "normalized",
        };
        write!(f, "{}", name)
    }
}

/// Configuration options for mapping.
#[derive(Debug, Clone, Default)]
pub struct MapperConfig {
    /// Behaviour for source fields that cannot be copied
    pub on_mismatch: MismatchPolicy,
    /// How field names are matched
    pub name_matching: NameMatching,
    /// Parse quoted primitives (`"123"`, `"true"`) into numeric/boolean fields
    pub coerce_quoted_values: bool,
}

/// Outcome of a single mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapReport {
    /// Destination fields that were written, in source order
    pub copied: Vec<String>,
    /// Source fields that were left out
    pub skipped: Vec<SkippedField>,
}

impl MapReport {
    /// True when every source field was copied.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Number of fields written.
    pub fn copied_count(&self) -> usize {
        self.copied.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkipReason;

    #[test]
    fn test_mismatch_policy_from_str() {
        assert_eq!("skip".parse::<MismatchPolicy>(), Ok(MismatchPolicy::Skip));
        assert_eq!("REPORT".parse::<MismatchPolicy>(), Ok(MismatchPolicy::Report));
        assert_eq!("fail".parse::<MismatchPolicy>(), Ok(MismatchPolicy::Fail));
        assert!("strict".parse::<MismatchPolicy>().is_err());
    }

    #[test]
    fn test_mismatch_policy_display() {
        assert_eq!(MismatchPolicy::Skip.to_string(), "skip");
        assert_eq!(MismatchPolicy::Fail.to_string(), "fail");
    }

    #[test]
    fn test_name_matching_from_str() {
        assert_eq!("exact".parse::<NameMatching>(), Ok(NameMatching::Exact));
        assert_eq!(
            "case-insensitive".parse::<NameMatching>(),
            Ok(NameMatching::CaseInsensitive)
        );
        assert_eq!(
            "normalized".parse::<NameMatching>(),
            Ok(NameMatching::Normalized)
        );
        assert!("fuzzy".parse::<NameMatching>().is_err());
    }

    #[test]
    fn test_name_matching_key() {
        assert_eq!(
            NameMatching::Exact.key("CorrelationNumber").as_deref(),
            Some("CorrelationNumber")
        );
        assert_eq!(
            NameMatching::CaseInsensitive.key("CorrelationNumber").as_deref(),
            Some("correlationnumber")
        );
        assert_eq!(
            NameMatching::Normalized.key("correlation_number"),
            NameMatching::Normalized.key("CorrelationNumber")
        );
        assert_eq!(
            NameMatching::Normalized.key("created-at").as_deref(),
            Some("createdat")
        );
        assert_ne!(
            NameMatching::CaseInsensitive.key("created_at"),
            NameMatching::CaseInsensitive.key("createdAt")
        );
    }

    #[test]
    fn test_normalized_key_keeps_non_ascii_letters() {
        assert_eq!(NameMatching::Normalized.key("名前").as_deref(), Some("名前"));
        assert_eq!(NameMatching::Normalized.key("年齢").as_deref(), Some("年齢"));
        assert_eq!(NameMatching::Normalized.key("Größe").as_deref(), Some("größe"));
        assert_eq!(
            NameMatching::Normalized.key("straße_nr").as_deref(),
            Some("straßenr")
        );
        assert_eq!(NameMatching::Normalized.key("x_٣").as_deref(), Some("x٣"));
    }

    #[test]
    fn test_normalized_key_empty_never_matches() {
        assert_eq!(NameMatching::Normalized.key("__"), None);
        assert_eq!(NameMatching::Normalized.key("-"), None);
        assert_eq!(NameMatching::Normalized.key(""), None);
        assert_eq!(NameMatching::Exact.key("").as_deref(), Some(""));
    }

    #[test]
    fn test_default_config() {
        let config = MapperConfig::default();
        assert_eq!(config.on_mismatch, MismatchPolicy::Skip);
        assert_eq!(config.name_matching, NameMatching::Exact);
        assert!(!config.coerce_quoted_values);
    }

    #[test]
    fn test_map_report_helpers() {
        let mut report = MapReport::default();
        assert!(report.is_complete());
        report.copied.push("id".to_string());
        report.skipped.push(SkippedField {
            name: "correlation_number".to_string(),
            reason: SkipReason::NoSuchField,
        });
        assert!(!report.is_complete());
        assert_eq!(report.copied_count(), 1);
    }
}
