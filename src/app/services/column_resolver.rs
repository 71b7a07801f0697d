//! Registration-number column detection
//!
//! Matches the header set against an ordered list of case-insensitive
//! patterns. Pattern priority dominates header position: every header is
//! tried against the first pattern before any header is tried against the
//! second. `None` means the caller has to supply an explicit column mapping.

use crate::constants::REGISTRATION_PATTERNS;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    REGISTRATION_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

/// Pick the header holding registration numbers, if any
pub fn resolve_registration_column(headers: &[String]) -> Option<&str> {
    for (priority, pattern) in PATTERNS.iter().enumerate() {
        if let Some(header) = headers.iter().find(|h| pattern.is_match(h)) {
            debug!(
                "Registration column '{}' matched pattern #{} ({})",
                header,
                priority + 1,
                pattern.as_str()
            );
            return Some(header.as_str());
        }
    }

    debug!("No registration column among {} headers", headers.len());
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(PATTERNS.len(), REGISTRATION_PATTERNS.len());
    }

    #[test]
    fn test_exact_registration_no_any_case() {
        for name in ["Registration No", "REGISTRATION NO", "registration no", "Registration No."] {
            let h = headers(&["Student", name, "Grade"]);
            assert_eq!(resolve_registration_column(&h), Some(name));
        }
    }

    #[test]
    fn test_common_variants() {
        let cases = [
            "Reg No",
            "REG_NO",
            "reg.no",
            "RegNo",
            "Registration",
            "Registration Number",
            "reg number",
        ];
        for name in cases {
            let h = headers(&["Name", name]);
            assert_eq!(resolve_registration_column(&h), Some(name), "header {name}");
        }
    }

    #[test]
    fn test_pattern_priority_beats_header_position() {
        // "Registration Date" matches only the broad `registration` pattern,
        // so the later "Reg No" header wins
        let h = headers(&["Registration Date", "Reg No"]);
        assert_eq!(resolve_registration_column(&h), Some("Reg No"));

        let h = headers(&["Reg No", "Registration No"]);
        assert_eq!(resolve_registration_column(&h), Some("Registration No"));
    }

    #[test]
    fn test_first_header_wins_within_a_pattern() {
        let h = headers(&["Old Reg No", "New Reg No"]);
        assert_eq!(resolve_registration_column(&h), Some("Old Reg No"));
    }

    #[test]
    fn test_no_match() {
        let h = headers(&["Name", "Father Name", "Course", "Grade"]);
        assert_eq!(resolve_registration_column(&h), None);
        assert_eq!(resolve_registration_column(&[]), None);
    }
}
