//! Topic-keyed follow-up prompts offered under each assistant reply.

struct TopicGroup {
    keywords: &'static [&'static str],
    suggestions: &'static [&'static str],
}

/// Checked in order; the first group with a keyword present in either text wins.
const TOPIC_GROUPS: &[TopicGroup] = &[
    TopicGroup {
        keywords: &["portfolio", "performance"],
        suggestions: &[
            "Create rebalancing strategy",
            "Show risk analysis",
            "Compare with market average",
        ],
    },
    TopicGroup {
        keywords: &["crypto", "bitcoin", "ethereum"],
        suggestions: &[
            "Get detailed ETH analysis",
            "Set price alerts",
            "Show risk metrics",
        ],
    },
    TopicGroup {
        keywords: &["market", "trend"],
        suggestions: &[
            "Get sector analysis",
            "Show top movers",
            "Set market alerts",
        ],
    },
    TopicGroup {
        keywords: &["financial plan", "retirement", "planning"],
        suggestions: &[
            "Provide my financial details",
            "Calculate retirement target",
            "Show investment allocation",
        ],
    },
    TopicGroup {
        keywords: &["stock", "equities", "shares"],
        suggestions: &[
            "Compare top stock picks",
            "Show dividend opportunities",
            "Explain valuation metrics",
        ],
    },
];

const FALLBACK: &[&str] = &[
    "Analyze my portfolio",
    "Show market trends",
    "Investment advice",
    "Risk analysis",
];

/// Derives three or four follow-up prompts from a reply and the question that
/// produced it. Never returns an empty list.
pub fn suggest(response: &str, user_text: &str) -> Vec<String> {
    let response = response.to_lowercase();
    let user_text = user_text.to_lowercase();

    TOPIC_GROUPS
        .iter()
        .find(|group| {
            group
                .keywords
                .iter()
                .any(|keyword| response.contains(keyword) || user_text.contains(keyword))
        })
        .map(|group| group.suggestions)
        .unwrap_or(FALLBACK)
        .iter()
        .map(|text| text.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_question_gets_crypto_set() {
        let suggestions = suggest(
            "Crypto assets are volatile; size positions carefully.",
            "What are the best crypto investments?",
        );
        assert_eq!(
            suggestions,
            vec!["Get detailed ETH analysis", "Set price alerts", "Show risk metrics"]
        );
    }

    #[test]
    fn earlier_groups_take_priority() {
        let suggestions = suggest("Your portfolio holds bitcoin.", "");
        assert_eq!(suggestions[0], "Create rebalancing strategy");
    }

    #[test]
    fn keywords_match_either_text_case_insensitively() {
        assert_eq!(suggest("", "Plan my RETIREMENT")[1], "Calculate retirement target");
        assert_eq!(suggest("Top STOCK ideas", "hello")[0], "Compare top stock picks");
    }

    #[test]
    fn unmatched_input_falls_back() {
        let suggestions = suggest("", "");
        assert_eq!(suggestions.len(), 4);
        assert_eq!(suggestions[0], "Analyze my portfolio");
    }

    #[test]
    fn every_set_has_three_or_four_entries() {
        for group in TOPIC_GROUPS {
            assert!((3..=4).contains(&group.suggestions.len()));
        }
        assert!((3..=4).contains(&FALLBACK.len()));
    }
}
