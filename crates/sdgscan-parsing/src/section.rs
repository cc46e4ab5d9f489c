use once_cell::sync::Lazy;
use regex::Regex;

use crate::heading::{StopHeading, find_abstract_marker, find_stop_heading_match};

/// Maximum number of whitespace-delimited words returned by the fallback tiers.
pub const ABSTRACT_WORD_LIMIT: usize = 300;

/// Which fallback produced an abstract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionTier {
    /// Text between the "ABSTRACT" marker and the next stop heading.
    MarkerToHeading,
    /// Marker found without a stop heading after it: leading words after the marker.
    MarkerLeadingWords,
    /// No marker: the paragraph right before the first stop heading.
    ParagraphBeforeHeading,
    /// No marker and no blank line before the stop heading: trailing words.
    WordsBeforeHeading,
    /// Neither marker nor stop heading: leading words of the document.
    DocumentLeadingWords,
}

impl ExtractionTier {
    /// 1-based fallback level (1 = precise, 4 = blind).
    pub fn level(&self) -> u8 {
        match self {
            Self::MarkerToHeading => 1,
            Self::MarkerLeadingWords => 2,
            Self::ParagraphBeforeHeading | Self::WordsBeforeHeading => 3,
            Self::DocumentLeadingWords => 4,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::MarkerToHeading => "abstract heading to next section heading",
            Self::MarkerLeadingWords => "first words after abstract heading",
            Self::ParagraphBeforeHeading => "paragraph before first section heading",
            Self::WordsBeforeHeading => "last words before first section heading",
            Self::DocumentLeadingWords => "first words of document",
        }
    }
}

/// An extracted abstract along with how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedAbstract {
    pub text: String,
    pub tier: ExtractionTier,
    /// The stop heading that bounded the abstract, for the tiers that use one.
    pub stop_heading: Option<StopHeading>,
}

/// Extract the abstract from sanitized document text.
///
/// Never fails: when heading markers are missing the result degrades to a
/// word-bounded slice of the document. See [`extract_abstract_detailed`].
pub fn extract_abstract(text: &str) -> String {
    extract_abstract_detailed(text).text
}

/// Extract the abstract and report which fallback tier produced it.
///
/// Tiers, in order:
/// 1. "ABSTRACT" marker and a stop heading after it: the text in between.
/// 2. Marker without a later stop heading: first 300 words after the marker.
/// 3. Stop heading without a marker: the last blank-line separated paragraph
///    before the heading, or the last 300 words before it when there is no
///    blank line.
/// 4. Neither: first 300 words of the document.
///
/// Word-bounded results are re-joined with single spaces.
pub fn extract_abstract_detailed(text: &str) -> ExtractedAbstract {
    if let Some(abstract_start) = find_abstract_marker(text) {
        let rest = &text[abstract_start..];
        return match find_stop_heading_match(rest) {
            Some(stop) => ExtractedAbstract {
                text: rest[..stop.offset].trim().to_string(),
                tier: ExtractionTier::MarkerToHeading,
                stop_heading: Some(stop.heading),
            },
            None => ExtractedAbstract {
                text: leading_words(rest, ABSTRACT_WORD_LIMIT),
                tier: ExtractionTier::MarkerLeadingWords,
                stop_heading: None,
            },
        };
    }

    if let Some(stop) = find_stop_heading_match(text) {
        let prefix = text[..stop.offset].trim_end();
        return match last_paragraph_start(prefix) {
            Some(start) => ExtractedAbstract {
                text: prefix[start..].trim().to_string(),
                tier: ExtractionTier::ParagraphBeforeHeading,
                stop_heading: Some(stop.heading),
            },
            None => ExtractedAbstract {
                text: trailing_words(prefix, ABSTRACT_WORD_LIMIT),
                tier: ExtractionTier::WordsBeforeHeading,
                stop_heading: Some(stop.heading),
            },
        };
    }

    ExtractedAbstract {
        text: leading_words(text, ABSTRACT_WORD_LIMIT),
        tier: ExtractionTier::DocumentLeadingWords,
        stop_heading: None,
    }
}

/// Byte offset just past the last paragraph break (a newline, optional
/// whitespace, then another newline).
fn last_paragraph_start(text: &str) -> Option<usize> {
    static PARAGRAPH_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

    PARAGRAPH_BREAK_RE.find_iter(text).last().map(|m| m.end())
}

fn leading_words(text: &str, limit: usize) -> String {
    text.split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ")
}

fn trailing_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let skip = words.len().saturating_sub(limit);
    words[skip..].join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(n: usize) -> String {
        (0..n)
            .map(|i| format!("w{i}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_marker_to_keywords() {
        let text = "A Study of Clean Water\nJ. Doe\nABSTRACT\nThis is the abstract body.\nKeywords: a, b, c\nIntroduction\nBody text.";
        let result = extract_abstract_detailed(text);
        assert_eq!(result.text, "This is the abstract body.");
        assert_eq!(result.tier, ExtractionTier::MarkerToHeading);
        assert_eq!(result.stop_heading, Some(StopHeading::Keywords));
    }

    #[test]
    fn test_marker_to_bare_keywords_line() {
        let text = "Abstract\n\n  Rivers carry\n  sediment downstream.  \n\nKeywords:\nrivers";
        assert_eq!(
            extract_abstract(text),
            "Rivers carry\n  sediment downstream."
        );
    }

    #[test]
    fn test_spaced_marker_to_numbered_introduction() {
        let text = "A B S T R A C T\nWe model urban heat islands.\n\n1. Introduction\nCities are warm.";
        let result = extract_abstract_detailed(text);
        assert_eq!(result.text, "We model urban heat islands.");
        assert_eq!(result.stop_heading, Some(StopHeading::NumberedIntroduction));
    }

    #[test]
    fn test_marker_with_inline_colon() {
        let text = "Abstract: Poverty maps from satellite imagery.\nI. INTRODUCTION\n";
        assert_eq!(
            extract_abstract(text),
            ": Poverty maps from satellite imagery."
        );
    }

    #[test]
    fn test_marker_immediately_followed_by_heading_is_empty() {
        let text = "ABSTRACT\nKeywords: none\nBackground\n";
        let result = extract_abstract_detailed(text);
        assert_eq!(result.text, "");
        assert_eq!(result.tier, ExtractionTier::MarkerToHeading);
    }

    #[test]
    fn test_stop_heading_before_marker_is_ignored() {
        // Only headings after the marker can close the abstract.
        let text = "Background\nAbstract\nOcean acidification trends.\nNotation\nx";
        assert_eq!(extract_abstract(text), "Ocean acidification trends.");
    }

    #[test]
    fn test_marker_without_stop_is_word_bounded() {
        let text = format!("ABSTRACT\n{}", numbered_words(500));
        let result = extract_abstract_detailed(&text);
        assert_eq!(result.tier, ExtractionTier::MarkerLeadingWords);
        assert_eq!(result.text.split_whitespace().count(), ABSTRACT_WORD_LIMIT);
        assert!(result.text.starts_with("w0 w1 "));
        assert!(result.text.ends_with(" w299"));
    }

    #[test]
    fn test_marker_without_stop_short_text_collapses_whitespace() {
        let text = "Abstract\n  Food   security\n\nin  drylands.\n";
        assert_eq!(extract_abstract(text), "Food security in drylands.");
    }

    #[test]
    fn test_single_line_document_has_no_line_anchored_stop() {
        // Headings only count at line starts; flattened text falls back to words.
        let text = "Header text ABSTRACT This is the abstract body. Keywords: a, b, c Introduction more";
        let result = extract_abstract_detailed(text);
        assert_eq!(result.tier, ExtractionTier::MarkerLeadingWords);
        assert_eq!(
            result.text,
            "This is the abstract body. Keywords: a, b, c Introduction more"
        );
    }

    #[test]
    fn test_paragraph_before_heading() {
        let text = "Title\nAuthors\n\nWe present a study of water.\nIt spans two lines.\n\nIntroduction\nBody";
        let result = extract_abstract_detailed(text);
        assert_eq!(result.tier, ExtractionTier::ParagraphBeforeHeading);
        assert_eq!(result.text, "We present a study of water.\nIt spans two lines.");
    }

    #[test]
    fn test_paragraph_break_with_whitespace_only_line() {
        let text = "Header\n   \t\nSummary paragraph here.\nBackground\n";
        assert_eq!(extract_abstract(text), "Summary paragraph here.");
    }

    #[test]
    fn test_indonesian_document_without_english_marker() {
        let text = "JUDUL PENELITIAN\n\nABSTRAK\nPenelitian ini membahas air bersih.\nKata Kunci: air, sanitasi\nBAB 1\nPENDAHULUAN";
        let result = extract_abstract_detailed(text);
        assert_eq!(result.tier, ExtractionTier::ParagraphBeforeHeading);
        assert_eq!(result.stop_heading, Some(StopHeading::Keywords));
        assert_eq!(result.text, "ABSTRAK\nPenelitian ini membahas air bersih.");
    }

    #[test]
    fn test_words_before_heading_without_blank_line() {
        let text = "Line one\nLine two\nBackground\nrest";
        let result = extract_abstract_detailed(text);
        assert_eq!(result.tier, ExtractionTier::WordsBeforeHeading);
        assert_eq!(result.text, "Line one Line two");
    }

    #[test]
    fn test_words_before_heading_keeps_last_words() {
        let text = format!("{}\nKeywords: x", numbered_words(400));
        let result = extract_abstract(&text);
        let words: Vec<&str> = result.split_whitespace().collect();
        assert_eq!(words.len(), ABSTRACT_WORD_LIMIT);
        assert_eq!(words[0], "w100");
        assert_eq!(words[ABSTRACT_WORD_LIMIT - 1], "w399");
    }

    #[test]
    fn test_heading_at_document_start() {
        let result = extract_abstract_detailed("Introduction\nBody");
        assert_eq!(result.tier, ExtractionTier::WordsBeforeHeading);
        assert_eq!(result.text, "");
    }

    #[test]
    fn test_neither_marker_nor_heading() {
        let body = numbered_words(450).replace(" w7 ", "\n\t w7  \n");
        let result = extract_abstract_detailed(&body);
        assert_eq!(result.tier, ExtractionTier::DocumentLeadingWords);
        assert_eq!(result.text, numbered_words(300));
    }

    #[test]
    fn test_word_limit_is_inclusive() {
        let text = numbered_words(ABSTRACT_WORD_LIMIT);
        assert_eq!(extract_abstract(&text), text);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert_eq!(extract_abstract(""), "");
        assert_eq!(extract_abstract(" \n\n\t "), "");
    }

    #[test]
    fn test_tier_levels() {
        assert_eq!(ExtractionTier::MarkerToHeading.level(), 1);
        assert_eq!(ExtractionTier::MarkerLeadingWords.level(), 2);
        assert_eq!(ExtractionTier::WordsBeforeHeading.level(), 3);
        assert_eq!(ExtractionTier::DocumentLeadingWords.level(), 4);
    }
}
