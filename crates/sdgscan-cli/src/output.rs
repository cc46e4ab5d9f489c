use std::io::Write;

use owo_colors::OwoColorize;
use sdgscan_core::{ClassificationScores, ClassifierError, ExtractedAbstract, LedgerSummary};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the extracted abstract and how it was found.
pub fn print_abstract(
    w: &mut dyn Write,
    file_name: &str,
    extracted: &ExtractedAbstract,
    color: ColorMode,
) -> std::io::Result<()> {
    let words = extracted.text.split_whitespace().count();
    let method = format!(
        "tier {}: {}",
        extracted.tier.level(),
        extracted.tier.description()
    );

    if color.enabled() {
        writeln!(w, "{} {}", "Abstract of".bold(), file_name.bold())?;
        writeln!(w, "{}", format!("({method}, {words} words)").dimmed())?;
    } else {
        writeln!(w, "Abstract of {file_name}")?;
        writeln!(w, "({method}, {words} words)")?;
    }
    if let Some(heading) = extracted.stop_heading {
        writeln!(w, "Ends at heading: {}", heading.label())?;
    }
    writeln!(w)?;

    if extracted.text.is_empty() {
        writeln!(w, "(empty)")?;
    } else {
        writeln!(w, "{}", extracted.text)?;
    }
    writeln!(w)?;
    Ok(())
}

/// Print the score table, highest first, marking goals above `threshold`.
pub fn print_scores(
    w: &mut dyn Write,
    scores: &ClassificationScores,
    threshold: f64,
    color: ColorMode,
) -> std::io::Result<()> {
    if scores.is_empty() {
        writeln!(w, "No SDG scores returned.")?;
        return Ok(());
    }

    let sorted = scores.sorted_desc();
    let width = sorted
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    if color.enabled() {
        writeln!(w, "{}", "SDG scores".bold())?;
    } else {
        writeln!(w, "SDG scores")?;
    }
    for (label, score) in &sorted {
        let row = format!("  {label:<width$}  {score:>6.2}%");
        let relevant = *score > threshold;
        match (relevant, color.enabled()) {
            (true, true) => writeln!(w, "{}", row.green().bold())?,
            (true, false) => writeln!(w, "{row}  *")?,
            (false, true) => writeln!(w, "{}", row.dimmed())?,
            (false, false) => writeln!(w, "{row}")?,
        }
    }

    let relevant = scores.triggered(threshold).len();
    writeln!(
        w,
        "\n{relevant} of {} goals above the {threshold}% relevance threshold",
        sorted.len()
    )?;
    Ok(())
}

/// Explain that classification failed; the abstract is still usable.
pub fn print_classifier_error(
    w: &mut dyn Write,
    err: &ClassifierError,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "WARNING:".yellow(), err)?;
    } else {
        writeln!(w, "WARNING: {err}")?;
    }
    writeln!(w, "No SDG scores available for this document.")?;
    Ok(())
}

/// Print the activity ledger summary.
pub fn print_insight(
    w: &mut dyn Write,
    summary: &LedgerSummary,
    color: ColorMode,
) -> std::io::Result<()> {
    let last = summary
        .last_upload
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    if color.enabled() {
        writeln!(w, "{} {}", "Total uploads:".bold(), summary.total)?;
        writeln!(w, "{} {}", "Last upload:".bold(), last)?;
    } else {
        writeln!(w, "Total uploads: {}", summary.total)?;
        writeln!(w, "Last upload: {last}")?;
    }

    if summary.recent.is_empty() {
        return Ok(());
    }
    writeln!(w, "\nLast {} uploads:", summary.recent.len())?;
    for event in &summary.recent {
        let when = event.uploaded_at.format("%Y-%m-%d %H:%M:%S");
        let place = match &event.location {
            Some(location) => format!("{}, {}", event.origin, location),
            None => event.origin.clone(),
        };
        let goals = match &event.triggered {
            Some(labels) if !labels.is_empty() => labels.join("; "),
            Some(_) => "-".to_string(),
            None => "failed".to_string(),
        };
        if color.enabled() {
            writeln!(
                w,
                "  {} {} ({}) {}",
                when.dimmed(),
                event.filename,
                place,
                goals.cyan()
            )?;
        } else {
            writeln!(w, "  {when} {} ({place}) {goals}", event.filename)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdgscan_core::{ExtractionTier, StopHeading, UploadEvent};

    const PLAIN: ColorMode = ColorMode(false);

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn abstract_header_names_tier() {
        let extracted = ExtractedAbstract {
            text: "We measure nitrate runoff.".to_string(),
            tier: ExtractionTier::MarkerToHeading,
            stop_heading: Some(StopHeading::Keywords),
        };
        let out = render(|w| print_abstract(w, "rivers.pdf", &extracted, PLAIN));
        assert!(out.starts_with("Abstract of rivers.pdf\n"));
        assert!(out.contains("(tier 1: abstract heading to next section heading, 4 words)"));
        assert!(out.contains("Ends at heading: Keywords"));
        assert!(out.contains("\nWe measure nitrate runoff.\n"));
    }

    #[test]
    fn scores_marked_against_threshold() {
        let scores: ClassificationScores = [
            ("Goal 6".to_string(), 81.5),
            ("Goal 14".to_string(), 30.0),
            ("Goal 1".to_string(), 2.25),
        ]
        .into_iter()
        .collect();
        let out = render(|w| print_scores(w, &scores, 30.0, PLAIN));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "SDG scores");
        assert_eq!(lines[1], "  Goal 6    81.50%  *");
        assert_eq!(lines[2], "  Goal 14   30.00%");
        assert_eq!(lines[3], "  Goal 1     2.25%");
        assert!(out.contains("1 of 3 goals above the 30% relevance threshold"));
    }

    #[test]
    fn empty_scores_and_errors() {
        let out = render(|w| print_scores(w, &ClassificationScores::new(), 30.0, PLAIN));
        assert_eq!(out, "No SDG scores returned.\n");

        let out = render(|w| print_classifier_error(w, &ClassifierError::Timeout, PLAIN));
        assert!(out.starts_with("WARNING: classifier request timed out\n"));
    }

    #[test]
    fn insight_lists_events() {
        let mut event = UploadEvent::new("rivers.pdf", "198.51.100.4")
            .with_triggered(Some(vec!["Goal 6".into(), "Goal 14".into()]));
        event.location = Some("Leiden, Netherlands".into());
        let failed = UploadEvent::new("scan.pdf", "unknown");
        let summary = LedgerSummary {
            total: 7,
            last_upload: Some(event.uploaded_at),
            recent: vec![event, failed],
        };
        let out = render(|w| print_insight(w, &summary, PLAIN));
        assert!(out.starts_with("Total uploads: 7\n"));
        assert!(out.contains("Last 2 uploads:"));
        assert!(out.contains("rivers.pdf (198.51.100.4, Leiden, Netherlands) Goal 6; Goal 14"));
        assert!(out.contains("scan.pdf (unknown) failed"));
    }

    #[test]
    fn insight_empty_ledger() {
        let out = render(|w| print_insight(w, &LedgerSummary::default(), PLAIN));
        assert_eq!(out, "Total uploads: 0\nLast upload: never\n");
    }
}
