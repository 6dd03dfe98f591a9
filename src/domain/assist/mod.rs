//! Assist module - deterministic answers used when no text-completion
//! provider answers.
//!
//! Option ideas pick a theme from whole words in the decision title and
//! description. Option refinement and description rewrites return canned text.

use crate::domain::decision::OptionDetails;

/// Broad subject of a decision, as far as keyword matching can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeaTheme {
    Vehicle,
    Career,
    Travel,
    General,
}

impl IdeaTheme {
    /// Picks a theme from the decision text. First match wins.
    pub fn detect(title: &str, description: Option<&str>) -> Self {
        let text = format!("{} {}", title, description.unwrap_or("")).to_lowercase();
        let words: Vec<&str> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let has = |candidates: &[&str]| words.iter().any(|w| candidates.contains(w));

        if has(&["car", "cars", "vehicle", "vehicles"]) {
            IdeaTheme::Vehicle
        } else if has(&["job", "jobs", "career", "work"]) {
            IdeaTheme::Career
        } else if has(&["vacation", "travel", "trip"]) {
            IdeaTheme::Travel
        } else {
            IdeaTheme::General
        }
    }
}

/// Three canned option ideas for the decision.
pub fn rule_based_ideas(title: &str, description: Option<&str>) -> Vec<OptionDetails> {
    let ideas: [(&str, &str, &str, &str); 3] = match IdeaTheme::detect(title, description) {
        IdeaTheme::Vehicle => [
            (
                "Buy a used hybrid",
                "Economical and environmentally friendly.",
                "Low fuel cost, reliable",
                "Higher initial cost than gas cars",
            ),
            (
                "Lease a new electric car",
                "Experience the latest technology with lower monthly payments.",
                "Newest features, no maintenance worries",
                "Never own the asset, mileage limits",
            ),
            (
                "Public transport + Car sharing",
                "Use trains/buses and rent a car only when needed.",
                "Cheapest option, no parking issues",
                "Less convenient, dependent on schedules",
            ),
        ],
        IdeaTheme::Career => [
            (
                "Upskill and stay",
                "Take courses to qualify for a promotion in your current company.",
                "Stability, known environment",
                "Might not solve cultural issues",
            ),
            (
                "Freelance/Consulting",
                "Start your own business using your current expertise.",
                "Flexibility, higher potential income",
                "Income instability, no benefits",
            ),
            (
                "Relocate for a new role",
                "Apply for positions in cities with better industry growth.",
                "Fresh start, better opportunities",
                "Moving costs, away from friends/family",
            ),
        ],
        IdeaTheme::Travel => [
            (
                "Staycation with local experiences",
                "Explore hidden gems in your own city/state.",
                "Very low cost, zero travel stress",
                "Might not feel like a 'real' break",
            ),
            (
                "All-inclusive resort",
                "Stress-free planning where everything is provided.",
                "Predictable budget, complete relaxation",
                "Less authentic local experience",
            ),
            (
                "Backpacking adventure",
                "Move between multiple locations with a flexible itinerary.",
                "Exciting, many experiences",
                "Physically demanding, less comfort",
            ),
        ],
        IdeaTheme::General => [
            (
                "Seek expert consultation",
                "Talk to a specialist in this specific field for advice.",
                "Professional insight",
                "Can be expensive",
            ),
            (
                "Delay the decision",
                "Wait for more information or for the situation to stabilize.",
                "Reduced uncertainty",
                "Opportunity cost of waiting",
            ),
            (
                "The 'Minimum Viable' approach",
                "Try the smallest, least risky version of your best option first.",
                "Low risk, fast learning",
                "Might not show full potential",
            ),
        ],
    };

    ideas
        .into_iter()
        .map(|(title, description, pros, cons)| OptionDetails {
            title: title.to_string(),
            description: description.to_string(),
            pros: pros.to_string(),
            cons: cons.to_string(),
        })
        .collect()
}

/// Placeholder details for an option the owner named.
pub fn refined_option_fallback(option_title: &str, decision_title: &str) -> OptionDetails {
    OptionDetails {
        title: option_title.to_string(),
        description: format!(
            "Details about {} specifically for '{}'.",
            option_title, decision_title
        ),
        pros: "Relevant to the decision context".to_string(),
        cons: "Needs further evaluation".to_string(),
    }
}

/// The draft description with a note that no rewrite was available.
pub fn clarified_description_fallback(description: &str) -> String {
    format!(
        "<p>{}</p><p><em>(Note: AI clarification unavailable. Consider adding more context \
         about the goals, constraints, and stakeholders involved in this decision.)</em></p>",
        description
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_theme_from_title_words() {
        assert_eq!(IdeaTheme::detect("Which car to buy?", None), IdeaTheme::Vehicle);
        assert_eq!(IdeaTheme::detect("Should I switch jobs?", None), IdeaTheme::Career);
        assert_eq!(IdeaTheme::detect("Summer trip plans", None), IdeaTheme::Travel);
        assert_eq!(IdeaTheme::detect("Adopt a dog", None), IdeaTheme::General);
    }

    #[test]
    fn description_is_considered() {
        assert_eq!(
            IdeaTheme::detect("Big change", Some("Thinking about my career")),
            IdeaTheme::Career
        );
    }

    #[test]
    fn matches_whole_words_only() {
        // "career" contains "car" but is not about vehicles.
        assert_eq!(IdeaTheme::detect("Career move", None), IdeaTheme::Career);
        assert_eq!(IdeaTheme::detect("Scarf colour", None), IdeaTheme::General);
    }

    #[test]
    fn always_three_ideas_with_titles() {
        for title in ["car", "job", "travel", "other"] {
            let ideas = rule_based_ideas(title, None);
            assert_eq!(ideas.len(), 3);
            assert!(ideas.iter().all(|i| !i.title.is_empty()));
        }
    }

    #[test]
    fn ideas_are_deterministic() {
        assert_eq!(
            rule_based_ideas("Should I switch jobs?", None),
            rule_based_ideas("Should I switch jobs?", None)
        );
        assert_eq!(
            rule_based_ideas("Should I switch jobs?", None)[0].title,
            "Upskill and stay"
        );
    }

    #[test]
    fn refined_fallback_names_option_and_decision() {
        let details = refined_option_fallback("Lease", "Which car?");
        assert_eq!(details.title, "Lease");
        assert_eq!(details.description, "Details about Lease specifically for 'Which car?'.");
        assert_eq!(details.pros, "Relevant to the decision context");
        assert_eq!(details.cons, "Needs further evaluation");
    }

    #[test]
    fn clarified_fallback_wraps_draft() {
        let html = clarified_description_fallback("Need a car");
        assert!(html.starts_with("<p>Need a car</p><p><em>(Note: AI clarification unavailable."));
        assert!(html.ends_with("involved in this decision.)</em></p>"));
    }
}
