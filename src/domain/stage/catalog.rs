//! Static reference data describing each stage.
//!
//! The catalog is compile-time constant; nothing mutates it at runtime.

use serde::Serialize;

use super::{StageId, UnknownStageError};

/// Display label and guidance text for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageDetails {
    pub key: StageId,
    pub label: &'static str,
    /// The question the stage asks of the decision maker.
    pub quote: &'static str,
    pub bullets: &'static [&'static str],
    /// The failure mode the stage guards against.
    pub risk: &'static str,
}

const CATALOG: [StageDetails; StageId::COUNT] = [
    StageDetails {
        key: StageId::Trigger,
        label: "1. Trigger / Awareness",
        quote: "\u{201c}Something important needs to be decided.\u{201d}",
        bullets: &[
            "External trigger (opportunity, risk, deadline)",
            "Internal trigger (dissatisfaction, aspiration, fear of loss)",
            "Decision recognized as non-trivial (irreversible or high impact)",
        ],
        risk: "ignoring the decision or reacting emotionally",
    },
    StageDetails {
        key: StageId::Framing,
        label: "2. Framing the Decision",
        quote: "\u{201c}What exactly am I deciding?\u{201d}",
        bullets: &[
            "Define the decision boundary (what is in vs out)",
            "Clarify time horizon (short vs long-term impact)",
            "Identify stakeholders (self, family, partners, shareholders)",
            "Key output: a clean decision statement",
            "\u{201c}Should I do X instead of Y within Z timeframe, given constraints A & B?\u{201d}",
        ],
        risk: "poorly framed decisions lead to wrong answers",
    },
    StageDetails {
        key: StageId::Objectives,
        label: "3. Objective & Constraint Definition",
        quote: "\u{201c}What does success look like?\u{201d}",
        bullets: &[
            "Primary objective(s) (e.g., ROI, happiness, flexibility, legacy)",
            "Non-negotiable constraints (budget, legality, ethics, health, time)",
            "Trade-offs you are willing vs unwilling to make",
            "Tools: priority ranking, must-have vs nice-to-have",
        ],
        risk: "hidden constraints sabotage later stages",
    },
    StageDetails {
        key: StageId::Options,
        label: "4. Option Generation",
        quote: "\u{201c}What are my real options?\u{201d}",
        bullets: &[
            "Obvious options (A vs B)",
            "Non-obvious options (delay, partial commit, hybrid, exit)",
            "Creative or asymmetric options",
            "Best practice: force at least 3\u{2013}5 viable options",
        ],
        risk: "false dichotomies (\u{201c}only two choices\u{201d})",
    },
    StageDetails {
        key: StageId::Information,
        label: "5. Information Gathering & Validation",
        quote: "\u{201c}What do I need to know?\u{201d}",
        bullets: &[
            "Facts, data, benchmarks",
            "Expert input",
            "First-hand validation (pilots, trials, site visits)",
            "Separate: What is known, What is assumed, What is unknowable",
        ],
        risk: "over-research or confirmation bias",
    },
    StageDetails {
        key: StageId::Evaluation,
        label: "6. Evaluation & Modeling",
        quote: "\u{201c}Which option dominates under which conditions?\u{201d}",
        bullets: &[
            "Pros/cons",
            "Financial models / scenarios",
            "Risk-reward asymmetry",
            "Best-case / worst-case analysis",
            "Reversibility vs irreversibility",
            "Common tools: Decision matrix, Expected value, Regret minimization, Pre-mortem analysis",
        ],
        risk: "analysis paralysis or false precision",
    },
    StageDetails {
        key: StageId::Emotions,
        label: "7. Emotional & Values Check",
        quote: "\u{201c}Can I live with this?\u{201d}",
        bullets: &[
            "Gut reaction (not gut decision)",
            "Alignment with identity and long-term values",
            "Stress test: \u{201c}How will I feel about this in 5\u{2013}10 years?\u{201d}",
            "Important: emotions are inputs, not noise",
        ],
        risk: "suppressing emotion or letting it dominate",
    },
    StageDetails {
        key: StageId::Commitment,
        label: "8. Commitment Decision",
        quote: "\u{201c}I choose.\u{201d}",
        bullets: &[
            "Explicitly select one option",
            "Acknowledge uncertainty",
            "Accept trade-offs consciously",
            "High performers write this down: Why this option, Why not the others, What would change the decision later",
        ],
        risk: "half-decisions and hedging without clarity",
    },
    StageDetails {
        key: StageId::Execution,
        label: "9. Execution Planning",
        quote: "\u{201c}How do I make this real?\u{201d}",
        bullets: &[
            "First irreversible step",
            "Timeline & milestones",
            "Resource allocation",
            "Kill criteria (when to stop or pivot)",
        ],
        risk: "good decisions ruined by poor execution",
    },
    StageDetails {
        key: StageId::Review,
        label: "10. Review & Adaptation",
        quote: "\u{201c}Was the decision good, given what was knowable?\u{201d}",
        bullets: &[
            "Outcome vs process evaluation",
            "What signals to monitor",
            "Adjust or double-down",
            "Key distinction: A good decision can have a bad outcome\u{2014}and vice versa.",
        ],
        risk: "ignoring the learning opportunity",
    },
];

/// All stages in progression order.
pub fn all_stages() -> &'static [StageId; StageId::COUNT] {
    &StageId::ALL
}

/// Full catalog entries in progression order.
pub fn all_details() -> &'static [StageDetails; StageId::COUNT] {
    &CATALOG
}

pub fn label_of(stage: StageId) -> &'static str {
    CATALOG[stage.index()].label
}

pub fn metadata_of(stage: StageId) -> &'static StageDetails {
    &CATALOG[stage.index()]
}

/// Looks up catalog metadata by storage key.
///
/// # Errors
///
/// - `UnknownStageError` for any key outside the fixed ten
pub fn lookup(key: &str) -> Result<&'static StageDetails, UnknownStageError> {
    let stage: StageId = key.parse()?;
    Ok(metadata_of(stage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_indexed_by_stage_position() {
        for stage in StageId::ALL {
            assert_eq!(metadata_of(stage).key, stage);
        }
    }

    #[test]
    fn all_stages_has_ten_entries_in_order() {
        let stages = all_stages();
        assert_eq!(stages.len(), 10);
        assert_eq!(stages[0], StageId::Trigger);
        assert_eq!(stages[9], StageId::Review);
        assert!(stages.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn labels_are_numbered() {
        assert_eq!(label_of(StageId::Evaluation), "6. Evaluation & Modeling");
        assert!(label_of(StageId::Review).starts_with("10."));
    }

    #[test]
    fn every_stage_has_guidance() {
        for details in all_details() {
            assert!(!details.quote.is_empty());
            assert!(!details.bullets.is_empty());
            assert!(!details.risk.is_empty());
        }
    }

    #[test]
    fn lookup_by_key() {
        assert_eq!(lookup("4_options").unwrap().label, "4. Option Generation");
        assert!(lookup("options").is_err());
        assert!(lookup("").is_err());
    }
}
