use std::str::FromStr;

use chrono::{DateTime, Utc};
use sdgscan_core::ClassificationScores;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Report output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Html,
    Markdown,
    Text,
    Json,
}

impl ReportFormat {
    pub fn all() -> &'static [ReportFormat] {
        &[
            ReportFormat::Html,
            ReportFormat::Markdown,
            ReportFormat::Text,
            ReportFormat::Json,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Markdown => "Markdown",
            Self::Text => "Plain Text",
            Self::Json => "JSON",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "md",
            Self::Text => "txt",
            Self::Json => "json",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Markdown => "text/markdown; charset=utf-8",
            Self::Text => "text/plain; charset=utf-8",
            Self::Json => "application/json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "md" | "markdown" => Ok(Self::Markdown),
            "txt" | "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

/// Everything a report shows about one document.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub filename: &'a str,
    pub abstract_text: &'a str,
    pub scores: &'a ClassificationScores,
    /// Scores strictly above this are marked relevant.
    pub threshold: f64,
    pub generated_at: DateTime<Utc>,
}

impl<'a> ReportInput<'a> {
    pub fn new(
        filename: &'a str,
        abstract_text: &'a str,
        scores: &'a ClassificationScores,
        threshold: f64,
    ) -> Self {
        Self {
            filename,
            abstract_text,
            scores,
            threshold,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_str() {
        assert_eq!(ReportFormat::from_str("HTML"), Ok(ReportFormat::Html));
        assert_eq!(ReportFormat::from_str("markdown"), Ok(ReportFormat::Markdown));
        assert_eq!(ReportFormat::from_str(" txt "), Ok(ReportFormat::Text));
        assert_eq!(ReportFormat::from_str("json"), Ok(ReportFormat::Json));
        assert!(ReportFormat::from_str("pdf").is_err());
        assert!(ReportFormat::from_str("").is_err());
    }

    #[test]
    fn every_format_round_trips_through_its_extension() {
        for fmt in ReportFormat::all() {
            assert!(!fmt.label().is_empty());
            assert_eq!(ReportFormat::from_str(fmt.extension()), Ok(*fmt));
        }
    }
}
