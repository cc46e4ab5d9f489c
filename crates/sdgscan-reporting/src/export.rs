use std::io::Write;
use std::path::Path;

use crate::types::{ReportError, ReportFormat, ReportInput};

const REPORT_TITLE: &str = "SDG Relevance Report";

/// Fixed notes printed above the abstract in every human-readable format.
const NOTES: [&str; 3] = [
    "Scores come from the Aurora multi-label classifier, which rates how relevant \
     a text is to each of the 17 UN Sustainable Development Goals.",
    "Only the abstract shown below was classified, not the full document.",
    "A score is the classifier's confidence in percent (0-100). Goals scoring above \
     the relevance threshold are marked as relevant.",
];

const NO_SCORES: &str = "No classification is available for this document.";

/// Render a report in the given format.
pub fn render_report(input: &ReportInput<'_>, format: ReportFormat) -> String {
    match format {
        ReportFormat::Html => export_html(input),
        ReportFormat::Markdown => export_markdown(input),
        ReportFormat::Text => export_text(input),
        ReportFormat::Json => export_json(input),
    }
}

/// Render a report and write it to `path`.
pub fn write_report(
    input: &ReportInput<'_>,
    format: ReportFormat,
    path: &Path,
) -> Result<(), ReportError> {
    let content = render_report(input, format);
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Download name for a report: `<stem>_sdg_report.<ext>`.
///
/// Characters that would break a `Content-Disposition` header are replaced.
pub fn report_filename(filename: &str, format: ReportFormat) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("document");
    let stem: String = stem
        .chars()
        .map(|c| {
            if c == '"' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{stem}_sdg_report.{}", format.extension())
}

/// One row of the score table.
struct ScoreRow<'a> {
    label: &'a str,
    score: f64,
    relevant: bool,
}

fn score_rows<'a>(input: &ReportInput<'a>) -> Vec<ScoreRow<'a>> {
    input
        .scores
        .sorted_desc()
        .into_iter()
        .map(|(label, score)| ScoreRow {
            label,
            score,
            relevant: score > input.threshold,
        })
        .collect()
}

fn generated_str(input: &ReportInput<'_>) -> String {
    input.generated_at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn export_json(input: &ReportInput<'_>) -> String {
    let scores: Vec<serde_json::Value> = score_rows(input)
        .iter()
        .map(|r| {
            serde_json::json!({
                "label": r.label,
                "score": r.score,
                "relevant": r.relevant,
            })
        })
        .collect();
    let doc = serde_json::json!({
        "title": REPORT_TITLE,
        "filename": input.filename,
        "generated_at": input.generated_at.to_rfc3339(),
        "abstract": input.abstract_text,
        "threshold": input.threshold,
        "scores": scores,
    });
    let mut out = serde_json::to_string_pretty(&doc).unwrap_or_default();
    out.push('\n');
    out
}

fn md_escape(s: &str) -> String {
    s.replace('|', "\\|")
}

fn export_markdown(input: &ReportInput<'_>) -> String {
    let mut out = format!("# {REPORT_TITLE}\n\n");
    out.push_str(&format!("**File:** {}  \n", md_escape(input.filename)));
    out.push_str(&format!("**Generated:** {}\n\n", generated_str(input)));

    for note in NOTES {
        out.push_str(&format!("> {note}\n"));
    }
    out.push('\n');

    out.push_str("## Abstract\n\n");
    out.push_str(input.abstract_text.trim());
    out.push_str("\n\n## SDG Scores\n\n");

    let rows = score_rows(input);
    if rows.is_empty() {
        out.push_str(&format!("_{NO_SCORES}_\n"));
        return out;
    }

    out.push_str("| SDG | Score (%) | Relevant |\n");
    out.push_str("|-----|----------:|:--------:|\n");
    for r in &rows {
        out.push_str(&format!(
            "| {} | {:.2} | {} |\n",
            md_escape(r.label),
            r.score,
            if r.relevant { "yes" } else { "" }
        ));
    }
    out
}

fn export_text(input: &ReportInput<'_>) -> String {
    let mut out = format!("{REPORT_TITLE}\n");
    out.push_str(&"=".repeat(60));
    out.push('\n');
    out.push_str(&format!("File:      {}\n", input.filename));
    out.push_str(&format!("Generated: {}\n\n", generated_str(input)));

    for note in NOTES {
        out.push_str(&format!("* {note}\n"));
    }

    out.push_str("\nAbstract\n--------\n");
    out.push_str(input.abstract_text.trim());
    out.push_str("\n\nSDG Scores\n----------\n");

    let rows = score_rows(input);
    if rows.is_empty() {
        out.push_str(NO_SCORES);
        out.push('\n');
        return out;
    }

    let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    for r in &rows {
        out.push_str(&format!(
            "  {:<width$}  {:>6.2}%{}\n",
            r.label,
            r.score,
            if r.relevant { "  [relevant]" } else { "" }
        ));
    }
    out
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn export_html(input: &ReportInput<'_>) -> String {
    let mut out = String::with_capacity(8192);
    out.push_str(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>SDG Relevance Report</title>
<style>
body {
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
  background: #f9f9f9;
  color: #333;
  line-height: 1.6;
  margin: 2rem auto;
  max-width: 860px;
  padding: 0 1rem;
}
h1 { color: #4a148c; margin-bottom: 0.25rem; }
.meta { color: #777; font-size: 0.9rem; margin-bottom: 1.5rem; }
.notes {
  background: #ede7f6;
  border-left: 4px solid #4a148c;
  padding: 0.75rem 1rem;
  margin-bottom: 1.5rem;
}
.notes li { margin-bottom: 0.3rem; }
.abstract {
  background: #fff;
  border-radius: 8px;
  box-shadow: 0 2px 8px rgba(0,0,0,0.05);
  padding: 1rem 1.25rem;
  white-space: pre-wrap;
}
table { border-collapse: collapse; width: 100%; margin-top: 0.5rem; background: #fff; }
th, td { padding: 0.5rem 0.75rem; border-bottom: 1px solid #e0e0e0; text-align: left; }
td.score { text-align: right; font-variant-numeric: tabular-nums; }
tr.relevant td { font-weight: 600; color: #1b5e20; }
.empty { color: #777; font-style: italic; }
</style>
</head>
<body>
"#,
    );

    out.push_str(&format!("<h1>{REPORT_TITLE}</h1>\n"));
    out.push_str(&format!(
        "<p class=\"meta\">{} &middot; generated {}</p>\n",
        html_escape(input.filename),
        generated_str(input)
    ));

    out.push_str("<ul class=\"notes\">\n");
    for note in NOTES {
        out.push_str(&format!("<li>{}</li>\n", html_escape(note)));
    }
    out.push_str("</ul>\n");

    out.push_str("<h2>Abstract</h2>\n");
    out.push_str(&format!(
        "<div class=\"abstract\">{}</div>\n",
        html_escape(input.abstract_text.trim())
    ));

    out.push_str("<h2>SDG Scores</h2>\n");
    let rows = score_rows(input);
    if rows.is_empty() {
        out.push_str(&format!("<p class=\"empty\">{NO_SCORES}</p>\n"));
    } else {
        out.push_str("<table>\n<thead><tr><th>SDG</th><th>Score (%)</th></tr></thead>\n<tbody>\n");
        for r in &rows {
            let class = if r.relevant { " class=\"relevant\"" } else { "" };
            out.push_str(&format!(
                "<tr{class}><td>{}</td><td class=\"score\">{:.2}</td></tr>\n",
                html_escape(r.label),
                r.score
            ));
        }
        out.push_str("</tbody>\n</table>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}
