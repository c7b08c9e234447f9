//! Keyword classifiers for prompt text and suggestion text.

use super::types::{PromptCategory, SuggestionCategory};

/// First matching row wins.
const PROMPT_KEYWORDS: &[(&[&str], PromptCategory)] = &[
    (&["compare", "versus", " vs"], PromptCategory::Comparison),
    (&["evidence", "studies", "data"], PromptCategory::Evidence),
    (&["between", "from", "during", "focus"], PromptCategory::Scope),
];

/// First matching row wins.
const SUGGESTION_KEYWORDS: &[(&[&str], SuggestionCategory)] = &[
    (&["evidence"], SuggestionCategory::Evidence),
    (&["compare", "comparison"], SuggestionCategory::Comparison),
    (&["depth"], SuggestionCategory::Depth),
    (&["breadth"], SuggestionCategory::Breadth),
    (
        &["specify", "domain", "population", "scope"],
        SuggestionCategory::Scope,
    ),
];

pub fn normalize_category(text: &str) -> PromptCategory {
    let lower = text.to_lowercase();
    PROMPT_KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| lower.contains(w)))
        .map(|(_, category)| *category)
        .unwrap_or(PromptCategory::Exploration)
}

pub fn suggestion_category(text: &str) -> SuggestionCategory {
    let lower = text.to_lowercase();
    SUGGESTION_KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| lower.contains(w)))
        .map(|(_, category)| *category)
        .unwrap_or(SuggestionCategory::Suggestion)
}

/// Dedup key for suggestions: trimmed and lowercased.
pub fn normalize_suggestion(text: &str) -> String {
    text.trim().to_lowercase()
}
