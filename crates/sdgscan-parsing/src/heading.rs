use once_cell::sync::Lazy;
use regex::Regex;

/// Locate the end of the first "ABSTRACT" heading in the document.
///
/// Matching is case-insensitive and tolerates whitespace runs between the
/// letters, which PDF extraction produces for letter-spaced headings
/// ("A B S T R A C T", "ABS TRACT"). Only the first occurrence is used, so a
/// table of contents mentioning "Abstract" ahead of the real section wins.
pub fn find_abstract_marker(text: &str) -> Option<usize> {
    static MARKER_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\bA\s*B\s*S\s*T\s*R\s*A\s*C\s*T\b").unwrap());

    MARKER_RE.find(text).map(|m| m.end())
}

/// A section heading that closes the abstract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopHeading {
    /// `Keywords` / `Kata Kunci`, with the keyword list allowed on the same line.
    Keywords,
    /// `Introduction`, `Latar Belakang`, `Chapter 1`, `Bab 1` on a line of their own.
    Introduction,
    /// `1. Introduction`, `I Introduction`, `Bab 1 Latar Belakang`, ...
    NumberedIntroduction,
    Notation,
    Background,
}

/// Stop headings in match priority order (used to break ties at equal offsets).
pub const STOP_HEADINGS: [StopHeading; 5] = [
    StopHeading::Keywords,
    StopHeading::Introduction,
    StopHeading::NumberedIntroduction,
    StopHeading::Notation,
    StopHeading::Background,
];

// Section headings stand alone: after the label only an optional colon/dash
// and whitespace may remain on the line.
static INTRODUCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^(?:Introduction|Latar\s*Belakang|Chapter\s*1|Bab\s*1)\s*[:\-]?\s*$")
        .unwrap()
});

static NUMBERED_INTRODUCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^(?:Chapter|Bab)?\s*(?:1|I)\.?\s+(?:Introduction|Latar\s*Belakang)\s*[:\-]?\s*$",
    )
    .unwrap()
});

static NOTATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^Notation\s*[:\-]?\s*$").unwrap());

static BACKGROUND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^Background\s*[:\-]?\s*$").unwrap());

// Keyword lists usually follow the label inline, so the rest of the line is free.
static KEYWORDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^(?:Keywords|Kata\s*Kunci)").unwrap());

impl StopHeading {
    /// Human-readable name, used in logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Keywords => "Keywords",
            Self::Introduction => "Introduction",
            Self::NumberedIntroduction => "Numbered introduction",
            Self::Notation => "Notation",
            Self::Background => "Background",
        }
    }

    fn regex(&self) -> &'static Regex {
        match self {
            Self::Keywords => &KEYWORDS_RE,
            Self::Introduction => &INTRODUCTION_RE,
            Self::NumberedIntroduction => &NUMBERED_INTRODUCTION_RE,
            Self::Notation => &NOTATION_RE,
            Self::Background => &BACKGROUND_RE,
        }
    }

    /// Byte offset of the first line start in `text` where this heading matches.
    ///
    /// The start of `text` counts as a line start, so searching a window that
    /// begins mid-line behaves as if the window were its own document.
    pub fn find(&self, text: &str) -> Option<usize> {
        self.regex().find(text).map(|m| m.start())
    }
}

/// Location of a stop heading within a search window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopHeadingMatch {
    /// Byte offset of the match start, relative to the searched text.
    pub offset: usize,
    pub heading: StopHeading,
}

/// Find the earliest stop heading in `text`.
///
/// Every matcher in [`STOP_HEADINGS`] runs independently; the match starting
/// first wins and equal starts go to the earlier matcher in the list.
pub fn find_stop_heading_match(text: &str) -> Option<StopHeadingMatch> {
    STOP_HEADINGS
        .iter()
        .filter_map(|&heading| {
            heading
                .find(text)
                .map(|offset| StopHeadingMatch { offset, heading })
        })
        .min_by_key(|m| m.offset)
}

/// Offset of the earliest stop heading in `text`, if any.
pub fn find_stop_heading(text: &str) -> Option<usize> {
    find_stop_heading_match(text).map(|m| m.offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_variants_match_identically() {
        for heading in ["Abstract", "A B S T R A C T", "ABSTRACT", "abs tract", "A\nBSTRACT"] {
            let text = format!("Title\n{heading}\nBody");
            let end = find_abstract_marker(&text).expect(heading);
            assert_eq!(&text[end..], "\nBody", "heading {heading:?}");
        }
    }

    #[test]
    fn test_marker_absent() {
        assert_eq!(find_abstract_marker(""), None);
        assert_eq!(find_abstract_marker("Summary\nWe study things."), None);
    }

    #[test]
    fn test_marker_requires_word_boundaries() {
        assert_eq!(find_abstract_marker("An abstraction layer."), None);
        assert_eq!(find_abstract_marker("Nonabstract reasoning"), None);
        assert_eq!(find_abstract_marker("Abstracts are short"), None);
        assert_eq!(find_abstract_marker("Abstract: we study"), Some(8));
    }

    #[test]
    fn test_marker_first_occurrence_only() {
        let text = "Contents\nAbstract ........ 1\n\nAbstract\nReal body.";
        assert_eq!(find_abstract_marker(text), Some("Contents\nAbstract".len()));
    }

    #[test]
    fn test_keywords_allows_trailing_content() {
        let text = "body text\nKeywords: climate, water, policy\nmore";
        let m = find_stop_heading_match(text).unwrap();
        assert_eq!(m.heading, StopHeading::Keywords);
        assert_eq!(m.offset, "body text\n".len());
    }

    #[test]
    fn test_kata_kunci_variants() {
        for line in ["Kata Kunci: air bersih", "Kata kunci - sanitasi", "KATAKUNCI"] {
            let text = format!("isi\n{line}");
            assert_eq!(
                StopHeading::Keywords.find(&text),
                Some(4),
                "line {line:?} should stop"
            );
        }
    }

    #[test]
    fn test_keywords_must_start_line() {
        assert_eq!(StopHeading::Keywords.find("see the Keywords: a, b"), None);
        assert_eq!(StopHeading::Keywords.find("  Keywords: a, b"), None);
    }

    #[test]
    fn test_introduction_standalone_only() {
        assert_eq!(StopHeading::Introduction.find("x\nIntroduction\ny"), Some(2));
        assert_eq!(StopHeading::Introduction.find("x\nINTRODUCTION:\ny"), Some(2));
        assert_eq!(StopHeading::Introduction.find("x\nIntroduction -  \ny"), Some(2));
        assert_eq!(
            StopHeading::Introduction.find("x\nIntroduction to the problem\ny"),
            None
        );
    }

    #[test]
    fn test_introduction_crlf_line_endings() {
        assert_eq!(
            StopHeading::Introduction.find("x\r\nIntroduction\r\ny"),
            Some(3)
        );
    }

    #[test]
    fn test_introduction_indonesian_and_chapter() {
        for line in ["Latar Belakang", "latar  belakang:", "Chapter 1", "BAB 1", "Bab1"] {
            let text = format!("a\n{line}\nb");
            assert_eq!(StopHeading::Introduction.find(&text), Some(2), "{line:?}");
        }
        assert_eq!(StopHeading::Introduction.find("a\nChapter 12\nb"), None);
    }

    #[test]
    fn test_numbered_introduction() {
        for line in [
            "1. Introduction",
            "1 Introduction",
            "I. INTRODUCTION",
            "Chapter 1 Introduction",
            "Bab I. Latar Belakang",
            "BAB 1 LATAR BELAKANG:",
        ] {
            let text = format!("a\n{line}\nb");
            assert_eq!(
                StopHeading::NumberedIntroduction.find(&text),
                Some(2),
                "{line:?}"
            );
        }
    }

    #[test]
    fn test_numbered_introduction_requires_separator() {
        assert_eq!(StopHeading::NumberedIntroduction.find("a\n1.Introduction\n"), None);
        assert_eq!(StopHeading::NumberedIntroduction.find("a\n2. Introduction\n"), None);
        assert_eq!(
            StopHeading::NumberedIntroduction.find("a\n1. Introduction of methods\n"),
            None
        );
    }

    #[test]
    fn test_numbered_introduction_allows_leading_whitespace() {
        assert_eq!(
            StopHeading::NumberedIntroduction.find("a\n   1. Introduction\n"),
            Some(2)
        );
    }

    #[test]
    fn test_notation_and_background() {
        assert_eq!(StopHeading::Notation.find("a\nNotation:\nb"), Some(2));
        assert_eq!(StopHeading::Background.find("a\nBACKGROUND\nb"), Some(2));
        assert_eq!(StopHeading::Background.find("a\nBackground of the study\nb"), None);
    }

    #[test]
    fn test_earliest_heading_wins() {
        let text = "body\nBackground\nmore\nKeywords: a\n";
        let m = find_stop_heading_match(text).unwrap();
        assert_eq!(m.heading, StopHeading::Background);
        assert_eq!(m.offset, 5);
    }

    #[test]
    fn test_equal_offsets_prefer_list_order() {
        // "Chapter 1" stands alone for the plain form, and the numbered form
        // reaches the title on the next line: both start at offset 0.
        let text = "Chapter 1\nIntroduction\n";
        assert_eq!(StopHeading::NumberedIntroduction.find(text), Some(0));
        let m = find_stop_heading_match(text).unwrap();
        assert_eq!(m.heading, StopHeading::Introduction);
        assert_eq!(m.offset, 0);
    }

    #[test]
    fn test_window_start_is_line_start() {
        // The window passed in may begin mid-line, right after the marker.
        assert_eq!(find_stop_heading("Keywords: a"), Some(0));
        assert_eq!(find_stop_heading(" Introduction\n"), None);
    }

    #[test]
    fn test_no_stop_heading() {
        assert_eq!(find_stop_heading(""), None);
        assert_eq!(find_stop_heading("Results\nDiscussion\nConclusion"), None);
    }
}
