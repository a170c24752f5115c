//! Heuristic quality scoring for generated answers.
//!
//! Scores are advisory. An answer that fails validation is still returned to
//! the caller together with the warnings, so clients can decide what to do
//! with weak output.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ConfidenceTag, QualityMetrics, ValidationResult};

/// Score an answer must reach to pass validation.
pub const PASSING_SCORE: u8 = 60;

/// Citations follow the `[Source: title](url)` syntax the prompt templates
/// instruct the model to use.
static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Source:\s*[^\]]+\]\([^)]*\)").unwrap());

/// Trailing confidence line, tolerant of case and a closing period.
static CONFIDENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)confidence:\s*(high|medium|low)\s*\.?\s*$").unwrap());

/// Fenced blocks or inline backtick spans.
static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[\s\S]*?```|`[^`\n]+`").unwrap());

/// Numbered or bulleted lines at the start of a line.
static STEPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(\d+[.)]\s+|[-*]\s+)").unwrap());

static SPECULATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(might be|may be|probably|perhaps|possibly|i think|i believe|it seems|not sure)\b",
    )
    .unwrap()
});

/// Phrasings the prompt templates use when the documents lack an answer.
const NOT_FOUND_PHRASES: &[&str] = &[
    "couldn't find this information",
    "could not find this information",
    "not in documentation",
    "no information available",
];

/// Score an answer against the grounding rubric.
///
/// `document_count` is the number of documents the answer was generated from;
/// it only affects the warnings, never the score. This function is pure and
/// never fails: any string gets a metrics breakdown, a score in 0..=100, and
/// a validity verdict.
pub fn validate(answer: &str, document_count: usize) -> ValidationResult {
    let trimmed = answer.trim_end();
    let lowered = answer.to_lowercase();

    let citation_count = CITATION.find_iter(answer).count();
    let confidence = CONFIDENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|tag| tag.as_str().parse().unwrap_or_default())
        .unwrap_or(ConfidenceTag::Unknown);

    let metrics = QualityMetrics {
        has_citation: citation_count > 0,
        has_confidence: confidence != ConfidenceTag::Unknown,
        is_not_found: NOT_FOUND_PHRASES
            .iter()
            .any(|phrase| lowered.contains(phrase)),
        has_code_example: CODE.is_match(answer),
        has_step_structure: STEPS.is_match(answer),
        has_speculative_language: SPECULATIVE.is_match(answer),
        word_count: answer.split_whitespace().count(),
    };

    let mut score: u8 = 0;
    if metrics.has_confidence {
        score += 25;
    }
    // A grounded claim needs a citation; an honest "not found" counts the same.
    if metrics.has_citation || metrics.is_not_found {
        score += 25;
    }
    if metrics.has_code_example {
        score += 15;
    }
    if metrics.has_step_structure {
        score += 15;
    }
    if !metrics.has_speculative_language {
        score += 10;
    }
    if metrics.word_count >= 50 {
        score += 10;
    }

    let mut warnings = Vec::new();
    if !metrics.has_citation && !metrics.is_not_found {
        warnings.push("Answer has no citations".to_string());
    }
    if !metrics.has_confidence {
        warnings.push("Answer is missing a trailing confidence tag".to_string());
    }
    if metrics.has_speculative_language && !metrics.is_not_found {
        warnings.push("Answer contains speculative language".to_string());
    }
    if metrics.word_count < 20 && !metrics.is_not_found {
        warnings.push("Answer is very short (under 20 words)".to_string());
    }
    if document_count > 0 && citation_count == 0 && !metrics.is_not_found {
        warnings.push("Answer should reference provided documents".to_string());
    }

    ValidationResult {
        is_valid: score >= PASSING_SCORE,
        confidence,
        score,
        warnings,
        quality_metrics: metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STRONG_ANSWER: &str = "To rotate your API key, follow these steps:\n\
        1. Open the settings page and locate the API section [Source: API guide](https://docs.example.com/api).\n\
        2. Click the rotate button and confirm the dialog.\n\
        3. Update your clients with the new key, for example `client.set_key(new_key)`.\n\
        The old key stays valid for one hour after rotation so deployed clients \
        have time to pick up the replacement without dropping requests.\n\
        Confidence: HIGH";

    #[test]
    fn test_strong_answer_passes() {
        let result = validate(STRONG_ANSWER, 2);

        assert!(result.is_valid);
        assert_eq!(result.confidence, ConfidenceTag::High);
        assert!(result.score >= PASSING_SCORE);
        assert!(result.warnings.is_empty(), "warnings: {:?}", result.warnings);
        assert!(result.quality_metrics.has_citation);
        assert!(result.quality_metrics.has_code_example);
        assert!(result.quality_metrics.has_step_structure);
    }

    #[test]
    fn test_score_stays_in_range_and_validity_tracks_threshold() {
        let samples = [
            "",
            "short",
            STRONG_ANSWER,
            "I couldn't find this information in the documentation.",
            "It might be a DNS issue, probably.",
        ];

        for sample in samples {
            let result = validate(sample, 0);
            assert!(result.score <= 100);
            assert_eq!(result.is_valid, result.score >= PASSING_SCORE);
        }
    }

    #[test]
    fn test_exact_threshold_is_valid() {
        // Confidence (25) + citation (25) + no speculation (10) = 60.
        let answer =
            "See the guide [Source: Guide](https://d/guide) for details.\nConfidence: MEDIUM";
        let result = validate(answer, 1);

        assert_eq!(result.score, 60);
        assert!(result.is_valid);
    }

    #[test]
    fn test_just_below_threshold_is_invalid() {
        // Citation (25) + steps (15) + code (15), speculation costs the rest.
        let answer = "1. Run `setup` [Source: Guide](https://d/guide), it might be enough.";
        let result = validate(answer, 1);

        assert_eq!(result.score, 55);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_confidence_extraction() {
        let result = validate("Answer body.\nconfidence: low", 0);
        assert_eq!(result.confidence, ConfidenceTag::Low);
        assert!(result.quality_metrics.has_confidence);

        let result = validate("Answer body with no tag.", 0);
        assert_eq!(result.confidence, ConfidenceTag::Unknown);
        assert!(!result.quality_metrics.has_confidence);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("confidence tag")));
    }

    #[test]
    fn test_confidence_must_trail_the_answer() {
        let result = validate("Confidence: HIGH is what we aim for in answers.", 0);
        assert_eq!(result.confidence, ConfidenceTag::Unknown);
    }

    #[test]
    fn test_not_found_counts_as_grounded() {
        let answer = "I couldn't find this information in the documentation.\nConfidence: LOW";
        let result = validate(answer, 3);

        assert!(result.quality_metrics.is_not_found);
        // Not-found substitutes for a citation, so no citation warnings fire.
        assert!(result.warnings.is_empty(), "warnings: {:?}", result.warnings);
        assert_eq!(result.score, 60);
        assert!(result.is_valid);
    }

    #[test]
    fn test_uncited_answer_with_documents_warns() {
        let answer = "Restart the service and the problem goes away.\nConfidence: HIGH";
        let result = validate(answer, 4);

        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("should reference provided documents")));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("no citations")));
    }

    #[test]
    fn test_uncited_answer_without_documents_does_not_demand_references() {
        let answer = "Restart the service and the problem goes away.\nConfidence: HIGH";
        let result = validate(answer, 0);

        assert!(!result
            .warnings
            .iter()
            .any(|w| w.contains("should reference provided documents")));
    }

    #[test]
    fn test_speculative_language_flagged() {
        let answer = "It might be the cache, I think.\nConfidence: LOW";
        let result = validate(answer, 0);

        assert!(result.quality_metrics.has_speculative_language);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("speculative")));
    }

    #[test]
    fn test_speculative_language_tolerated_in_not_found() {
        let answer = "I couldn't find this information in the documentation. \
            It might be covered in the enterprise docs.\nConfidence: LOW";
        let result = validate(answer, 0);

        assert!(result.quality_metrics.has_speculative_language);
        assert!(!result.warnings.iter().any(|w| w.contains("speculative")));
    }

    #[test]
    fn test_short_answer_warns() {
        let result = validate("Yes.\nConfidence: HIGH", 0);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("very short")));
    }

    #[test]
    fn test_code_detection() {
        assert!(validate("Use `cargo run` to start.", 0).quality_metrics.has_code_example);
        assert!(
            validate("```\nlet x = 1;\n```", 0)
                .quality_metrics
                .has_code_example
        );
        assert!(!validate("No code here.", 0).quality_metrics.has_code_example);
    }

    #[test]
    fn test_step_detection() {
        assert!(validate("1. First\n2. Second", 0).quality_metrics.has_step_structure);
        assert!(validate("- item\n- item", 0).quality_metrics.has_step_structure);
        assert!(!validate("Plain prose answer.", 0).quality_metrics.has_step_structure);
    }

    #[test]
    fn test_word_count() {
        let result = validate("one two three", 0);
        assert_eq!(result.quality_metrics.word_count, 3);
    }
}
