//! Source-count policy: how much web does a query need?
//!
//! A deterministic, keyword-driven heuristic — not a model call — so the
//! retrieval plan costs nothing and stays fully testable. Procedural
//! queries want one exhaustive source; news wants several small ones to
//! synthesize; everything else sits in between. The aggregate cap is
//! fixed regardless of class to protect the generator's context window.

/// Retrieval budget derived per query; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBudget {
    /// How many search results to fetch (1–3).
    pub source_count: usize,
    /// Character cap applied to each fetched source.
    pub per_source_char_cap: usize,
    /// Aggregate character cap across all source blocks.
    pub total_char_cap: usize,
}

/// Intent class behind a query, as seen by the retrieval planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
    /// Recipes, how-tos, tutorials: one complete source beats many partial ones.
    Tutorial,
    /// News and current events: several perspectives, small slices of each.
    News,
    /// Everything else: two sources for comparison.
    Generic,
}

/// Aggregate cap, fixed regardless of intent class.
pub const TOTAL_CHAR_CAP: usize = 10_000;

/// Ordered rule table: first matching class wins. Tutorial outranks News
/// so "how to follow the news" plans a single exhaustive source.
const INTENT_RULES: &[(QueryIntent, &[&str])] = &[
    (
        QueryIntent::Tutorial,
        &[
            "ricetta", "recipe", "come fare", "come si fa", "how to", "tutorial",
        ],
    ),
    (
        QueryIntent::News,
        &[
            "notizie", "news", "oggi", "attualità", "ultime", "today", "latest",
        ],
    ),
];

/// Classify a query by lower-cased substring match against the rule table.
pub fn classify_intent(query: &str) -> QueryIntent {
    let lowered = query.to_lowercase();
    for (intent, keywords) in INTENT_RULES {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return *intent;
        }
    }
    QueryIntent::Generic
}

/// Derive the retrieval budget for a query. Pure: identical input always
/// yields an identical budget.
pub fn budget_for(query: &str) -> ContextBudget {
    let (source_count, per_source_char_cap) = match classify_intent(query) {
        QueryIntent::Tutorial => (1, 8000),
        QueryIntent::News => (3, 2000),
        QueryIntent::Generic => (2, 3000),
    };
    ContextBudget {
        source_count,
        per_source_char_cap,
        total_char_cap: TOTAL_CHAR_CAP,
    }
}
