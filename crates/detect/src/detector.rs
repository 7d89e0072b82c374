use crate::patterns::CONCEPT_PATTERNS;
use clausemap_model::{ConceptChange, ConceptEntry, ConceptKey};

/// Diff the before/after text of an accepted revision against the pattern
/// table and the provisions already on record for the paragraph.
///
/// `prior` is the registry's entries for this `para_id`, captured before
/// the edit; it lets the detector report a removal even when the original
/// snippet passed in no longer carries the provision language.
///
/// At most one change per concept key per call. An empty result is the
/// common case and means the edit did not touch risk-relevant language.
#[must_use]
pub fn detect(
    prior: &[&ConceptEntry],
    before_text: &str,
    after_text: &str,
    section_ref: &str,
    para_id: &str,
) -> Vec<ConceptChange> {
    let mut changes = Vec::new();

    for pattern in CONCEPT_PATTERNS.iter() {
        let before = pattern.extract(before_text);
        let after = pattern.extract(after_text);

        let recorded = prior
            .iter()
            .find(|e| e.category == pattern.category && e.key == pattern.key);

        let change = match (before.is_empty(), after.is_empty()) {
            // Provision language appeared in the revision. If the
            // registry already records this provision for the paragraph,
            // the clause was rewritten rather than extended, so audit it
            // as a modification of the recorded value.
            (true, false) => {
                let value = after.iter().next().cloned().unwrap_or_default();
                let entry =
                    ConceptEntry::new(pattern.category, pattern.key, value, section_ref, para_id);
                match recorded {
                    Some(existing) => Some(ConceptChange::Modified {
                        entry,
                        previous_value: existing.value.clone(),
                    }),
                    None => Some(ConceptChange::Added { entry }),
                }
            }
            // Present on both sides; a change only if the value moved.
            (false, false) => {
                if before == after {
                    None
                } else {
                    let value = after.iter().next().cloned().unwrap_or_default();
                    let previous_value = before.iter().next().cloned().unwrap_or_default();
                    Some(ConceptChange::Modified {
                        entry: ConceptEntry::new(
                            pattern.category,
                            pattern.key,
                            value,
                            section_ref,
                            para_id,
                        ),
                        previous_value,
                    })
                }
            }
            // Language dropped out of the clause.
            (false, true) => Some(ConceptChange::Removed {
                key: ConceptKey::new(pattern.category, pattern.key),
                last_value: before.iter().next().cloned().unwrap_or_default(),
            }),
            // Nothing in either snippet, but the registry still holds a
            // provision here: the clause was rewritten out from under it.
            (true, true) => recorded.map(|entry| ConceptChange::Removed {
                key: entry.concept_key(),
                last_value: entry.value.clone(),
            }),
        };

        if let Some(change) = change {
            log::debug!("detected in {section_ref}: {}", change.summary());
            changes.push(change);
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausemap_model::ConceptCategory;
    use pretty_assertions::assert_eq;

    const BASKET_CLAUSE: &str = "Seller shall not be liable unless aggregate claims exceed \
                                 $50,000 (the \"Basket\"), in which case Seller is liable for \
                                 all such claims.";

    #[test]
    fn no_changes_for_untouched_provisions() {
        let changes = detect(
            &[],
            BASKET_CLAUSE,
            BASKET_CLAUSE,
            "8.3",
            "p_9",
        );
        assert!(changes.is_empty());
    }

    #[test]
    fn raised_basket_reads_as_modified() {
        let revised = BASKET_CLAUSE.replace("$50,000", "$250,000");
        let changes = detect(&[], BASKET_CLAUSE, &revised, "8.3", "p_9");

        assert_eq!(changes.len(), 1);
        match &changes[0] {
            ConceptChange::Modified {
                entry,
                previous_value,
            } => {
                assert_eq!(entry.key, "basket");
                assert_eq!(entry.value, "250,000");
                assert_eq!(previous_value, "50,000");
                assert_eq!(entry.section_ref, "8.3");
            }
            other => panic!("expected Modified, got {other:?}"),
        }
    }

    #[test]
    fn new_cap_language_reads_as_added() {
        let before = "Seller shall indemnify Buyer for all Losses.";
        let after = "Seller shall indemnify Buyer for all Losses, capped at $1,000,000.";
        let changes = detect(&[], before, after, "8.4", "p_10");

        assert_eq!(changes.len(), 1);
        match &changes[0] {
            ConceptChange::Added { entry } => {
                assert_eq!(entry.key, "cap");
                assert_eq!(entry.value, "1,000,000");
                assert_eq!(entry.para_id, "p_10");
            }
            other => panic!("expected Added, got {other:?}"),
        }
    }

    #[test]
    fn recorded_provision_reappearing_reads_as_modified() {
        // The basket is on record for this paragraph, but the snippet
        // under revision only shows the language on the after side. A
        // rewrite of a recorded provision is a modification, not an
        // addition.
        let recorded = ConceptEntry::new(
            ConceptCategory::LiabilityLimitation,
            "basket",
            "50,000",
            "8.3",
            "p_9",
        );
        let changes = detect(
            &[&recorded],
            "Seller shall indemnify Buyer for all Losses.",
            "Seller shall indemnify Buyer for Losses exceeding $75,000 in the aggregate.",
            "8.3",
            "p_9",
        );

        assert_eq!(changes.len(), 1);
        match &changes[0] {
            ConceptChange::Modified {
                entry,
                previous_value,
            } => {
                assert_eq!(entry.key, "basket");
                assert_eq!(entry.value, "75,000");
                assert_eq!(previous_value, "50,000");
            }
            other => panic!("expected Modified, got {other:?}"),
        }
    }

    #[test]
    fn dropped_basket_reads_as_removed() {
        let after = "Seller shall be liable for all claims without limitation.";
        let changes = detect(&[], BASKET_CLAUSE, after, "8.3", "p_9");

        assert_eq!(changes.len(), 1);
        match &changes[0] {
            ConceptChange::Removed { key, last_value } => {
                assert_eq!(key.key, "basket");
                assert_eq!(key.category, ConceptCategory::LiabilityLimitation);
                assert_eq!(last_value, "50,000");
            }
            other => panic!("expected Removed, got {other:?}"),
        }
    }

    #[test]
    fn registry_entry_backstops_removal_detection() {
        // The snippet under revision no longer shows the provision on
        // either side, but the registry still records it for this
        // paragraph.
        let recorded = ConceptEntry::new(
            ConceptCategory::TerminationTrigger,
            "termination",
            "termination",
            "11.2",
            "p_30",
        );
        let changes = detect(
            &[&recorded],
            "upon such event the parties shall meet and confer",
            "upon such event the parties shall meet and confer in good faith",
            "11.2",
            "p_30",
        );

        assert_eq!(changes.len(), 1);
        assert!(matches!(&changes[0], ConceptChange::Removed { key, .. } if key.key == "termination"));
    }

    #[test]
    fn removed_auto_termination_is_detected() {
        let before = "This Agreement shall automatically terminate upon any breach.";
        let after = "Upon any breach, the parties shall negotiate in good faith.";
        let changes = detect(&[], before, after, "11.2", "p_30");

        assert_eq!(changes.len(), 1);
        assert!(matches!(&changes[0], ConceptChange::Removed { key, .. } if key.key == "termination"));
    }

    #[test]
    fn one_change_per_concept_key() {
        // Two basket-ish keywords moving at once still yield one change.
        let before = "aggregate claims exceeding $50,000, with a deductible of $50,000";
        let after = "aggregate claims exceeding $75,000, with a deductible of $75,000";
        let changes = detect(&[], before, after, "8.3", "p_9");

        let basket_changes: Vec<_> = changes
            .iter()
            .filter(|c| c.key().key == "basket")
            .collect();
        assert_eq!(basket_changes.len(), 1);
    }
}
