use clausemap_model::{ConceptCategory, ConceptEntry, ConceptKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Document-wide provisions grouped by legal concept category.
///
/// Pure storage: no side effects beyond its own maps, and every operation
/// is total over the key space. Overwriting an existing `(category, key)`
/// is the normal update path, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRegistry {
    concepts: BTreeMap<ConceptCategory, BTreeMap<String, ConceptEntry>>,
}

impl ConceptRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry at `(entry.category, entry.key)`.
    ///
    /// Returns the displaced entry when this was an overwrite.
    pub fn upsert(&mut self, entry: ConceptEntry) -> Option<ConceptEntry> {
        self.concepts
            .entry(entry.category)
            .or_default()
            .insert(entry.key.clone(), entry)
    }

    /// Remove an entry, returning it if it existed.
    ///
    /// Removal has no side effects on the risk graph; the caller is
    /// responsible for running impact propagation afterward.
    pub fn remove(&mut self, category: ConceptCategory, key: &str) -> Option<ConceptEntry> {
        self.concepts.get_mut(&category)?.remove(key)
    }

    #[must_use]
    pub fn get(&self, category: ConceptCategory, key: &str) -> Option<&ConceptEntry> {
        self.concepts.get(&category)?.get(key)
    }

    /// Whether the registry currently holds the edge target.
    #[must_use]
    pub fn contains(&self, key: &ConceptKey) -> bool {
        self.get(key.category, &key.key).is_some()
    }

    /// All entries across categories, in (category, key) order.
    pub fn entries(&self) -> impl Iterator<Item = &ConceptEntry> {
        self.concepts.values().flat_map(|by_key| by_key.values())
    }

    /// Entries extracted from a specific paragraph.
    #[must_use]
    pub fn entries_for_para(&self, para_id: &str) -> Vec<&ConceptEntry> {
        self.entries().filter(|e| e.para_id == para_id).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.concepts.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the registry for inclusion in an LLM prompt.
    ///
    /// Category headings in caps, one `- key: value (Section X)` line per
    /// provision, extra attributes appended in parentheses.
    #[must_use]
    pub fn to_prompt_block(&self) -> String {
        let mut lines = Vec::new();

        for (category, provisions) in &self.concepts {
            if provisions.is_empty() {
                continue;
            }
            lines.push(format!("{}:", category.heading()));

            for (key, entry) in provisions {
                let section = if entry.section_ref.is_empty() {
                    "?"
                } else {
                    entry.section_ref.as_str()
                };
                let extras = entry
                    .attributes
                    .iter()
                    .filter(|(_, v)| !v.is_empty())
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>();
                let extra_str = if extras.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", extras.join(", "))
                };
                lines.push(format!(
                    "  - {key}: {} (Section {section}){extra_str}",
                    entry.value
                ));
            }

            lines.push(String::new());
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn basket() -> ConceptEntry {
        ConceptEntry::new(
            ConceptCategory::LiabilityLimitation,
            "basket",
            "50,000",
            "8.3",
            "p_9",
        )
    }

    #[test]
    fn upsert_overwrites_and_returns_previous() {
        let mut registry = ConceptRegistry::new();
        assert!(registry.upsert(basket()).is_none());

        let mut updated = basket();
        updated.value = "100,000".to_string();
        let displaced = registry.upsert(updated).unwrap();
        assert_eq!(displaced.value, "50,000");
        assert_eq!(
            registry
                .get(ConceptCategory::LiabilityLimitation, "basket")
                .unwrap()
                .value,
            "100,000"
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_reports_presence() {
        let mut registry = ConceptRegistry::new();
        registry.upsert(basket());

        assert!(registry
            .remove(ConceptCategory::LiabilityLimitation, "basket")
            .is_some());
        assert!(registry
            .remove(ConceptCategory::LiabilityLimitation, "basket")
            .is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn entries_for_para_filters_by_owner() {
        let mut registry = ConceptRegistry::new();
        registry.upsert(basket());
        registry.upsert(ConceptEntry::new(
            ConceptCategory::DefaultRemedy,
            "cure_period",
            "30",
            "9.1",
            "p_14",
        ));

        let found = registry.entries_for_para("p_14");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key, "cure_period");
    }

    #[test]
    fn prompt_block_groups_by_category() {
        let mut registry = ConceptRegistry::new();
        registry.upsert(basket().with_attribute("scope", "indemnity claims"));
        registry.upsert(ConceptEntry::new(
            ConceptCategory::TerminationTrigger,
            "termination",
            "automatic on change of control",
            "11.2",
            "p_30",
        ));

        let block = registry.to_prompt_block();
        assert!(block.contains("LIABILITY LIMITATIONS:"));
        assert!(block.contains("  - basket: 50,000 (Section 8.3) (scope: indemnity claims)"));
        assert!(block.contains("TERMINATION TRIGGERS:"));
    }
}
