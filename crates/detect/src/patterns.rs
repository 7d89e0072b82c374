//! Named table of extraction patterns, one group per concept key.

use clausemap_model::ConceptCategory;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// How a pattern group yields a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Capture group 1 holds the value (dollar amount, day count, ...).
    Captured,
    /// The pattern only signals presence; the concept key stands in as
    /// the value, so rewordings never read as modifications.
    Presence,
}

/// One concept key with the regexes that extract it from clause text.
#[derive(Debug)]
pub struct ConceptPattern {
    pub key: &'static str,
    pub category: ConceptCategory,
    pub value: ValueKind,
    pub regexes: Vec<Regex>,
}

impl ConceptPattern {
    fn new(
        key: &'static str,
        category: ConceptCategory,
        value: ValueKind,
        sources: &[&str],
    ) -> Self {
        let regexes = sources
            .iter()
            .map(|src| Regex::new(src).expect("pattern table regex must compile"))
            .collect();
        Self {
            key,
            category,
            value,
            regexes,
        }
    }

    /// Distinct normalized values this pattern group finds in `text`.
    #[must_use]
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let mut values = BTreeSet::new();
        for regex in &self.regexes {
            match self.value {
                ValueKind::Captured => {
                    for caps in regex.captures_iter(text) {
                        if let Some(m) = caps.get(1) {
                            let value = m.as_str().trim();
                            if !value.is_empty() {
                                values.insert(value.to_string());
                            }
                        }
                    }
                }
                ValueKind::Presence => {
                    if regex.is_match(text) {
                        values.insert(self.key.to_string());
                    }
                }
            }
        }
        values
    }
}

/// Extraction table for revision diffing.
///
/// `\D*` runs to the first digit, so the capture picks up the whole
/// number even when other words sit between the keyword and the amount.
pub static CONCEPT_PATTERNS: Lazy<Vec<ConceptPattern>> = Lazy::new(|| {
    vec![
        ConceptPattern::new(
            "basket",
            ConceptCategory::LiabilityLimitation,
            ValueKind::Captured,
            &[
                r"(?i)basket\D*\$?([\d,]*\d)",
                r"(?i)deductible\D*\$?([\d,]*\d)",
                r"(?i)threshold\D*\$?([\d,]*\d)",
                r"(?i)aggregate\D*\$?([\d,]*\d)",
                r"(?i)exceed(?:ing|s)?\s+\$?([\d,]*\d)",
            ],
        ),
        ConceptPattern::new(
            "cap",
            ConceptCategory::LiabilityLimitation,
            ValueKind::Captured,
            &[
                r"(?i)(?:cap(?:ped)?|maximum|limit)\D*\$?([\d,]*\d)",
                r"(?i)not\s+(?:to\s+)?exceed\D*\$?([\d,]*\d)",
                r"(?i)liability\D*limited\D*\$?([\d,]*\d)",
                r"(?i)in\s+no\s+event\D*exceed\D*\$?([\d,]*\d)",
            ],
        ),
        ConceptPattern::new(
            "survival",
            ConceptCategory::LiabilityLimitation,
            ValueKind::Captured,
            &[
                r"(?i)surviv(?:e|es|al)\D*(\d+)\s*(?:month|year)",
                r"(?i)(\d+)\s*(?:month|year)s?\D*surviv",
                r"(?i)(?:period|term)\D*(\d+)\s*(?:month|year)s?\D*(?:after|following)",
            ],
        ),
        ConceptPattern::new(
            "cure_period",
            ConceptCategory::DefaultRemedy,
            ValueKind::Captured,
            &[
                r"(?i)(\d+)\s*(?:business\s+)?days?\D*(?:cure|remedy)",
                r"(?i)(?:cure|remedy)\D*(\d+)\s*(?:business\s+)?days?",
                r"(?i)notice\D*(\d+)\s*(?:business\s+)?days?",
                r"(?i)(\d+)\s*(?:business\s+)?days?'?\s+(?:notice|period)",
            ],
        ),
        ConceptPattern::new(
            "termination",
            ConceptCategory::TerminationTrigger,
            ValueKind::Presence,
            &[
                r"(?i)terminat(?:e|es|ed|ion)",
                r"(?i)cancel(?:lation)?",
                r"(?i)rescind",
                r"(?i)right\s+to\s+(?:terminate|cancel)",
            ],
        ),
        ConceptPattern::new(
            "knowledge",
            ConceptCategory::KnowledgeStandard,
            ValueKind::Presence,
            &[
                r"(?i)actual\s+knowledge",
                r"(?i)constructive\s+knowledge",
                r"(?i)to\s+the\s+knowledge\s+of",
                r"(?i)\bknowledge\b",
            ],
        ),
    ]
});
