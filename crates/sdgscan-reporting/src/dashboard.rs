//! HTML dashboard summarizing the activity ledger.

use chrono::{DateTime, Utc};
use sdgscan_core::{LedgerSummary, UploadEvent};

use crate::export::html_escape;

fn timestamp(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn write_event(out: &mut String, event: &UploadEvent) {
    out.push_str("<li>");
    out.push_str(&format!(
        "<span class=\"time\">{}</span> &middot; <strong>{}</strong> ({}",
        timestamp(&event.uploaded_at),
        html_escape(&event.filename),
        html_escape(&event.origin)
    ));
    if let Some(location) = &event.location {
        out.push_str(&format!(", {}", html_escape(location)));
    }
    out.push(')');

    match &event.triggered {
        Some(labels) if !labels.is_empty() => {
            out.push_str("<div class=\"sdgs\">");
            for label in labels {
                out.push_str(&format!("<span class=\"sdg\">{}</span>", html_escape(label)));
            }
            out.push_str("</div>");
        }
        Some(_) => out.push_str("<div class=\"sdgs dim\">no goal above threshold</div>"),
        None => out.push_str("<div class=\"sdgs dim\">not processed</div>"),
    }
    out.push_str("</li>\n");
}

/// Render the ledger summary as a standalone HTML page.
pub fn render_dashboard(summary: &LedgerSummary) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Platform Insight</title>
<style>
body { font-family: Arial, sans-serif; margin: 40px; background-color: #f9f9f9; color: #333; }
h1 { color: #4a148c; }
.section {
  background-color: #fff;
  padding: 20px;
  margin-bottom: 30px;
  border-radius: 8px;
  box-shadow: 0 2px 8px rgba(0,0,0,0.05);
}
ul { padding-left: 20px; }
li { margin-bottom: 10px; }
.time { color: #777; font-variant-numeric: tabular-nums; }
.sdg {
  display: inline-block;
  background: #ede7f6;
  color: #4a148c;
  border-radius: 4px;
  padding: 0 6px;
  margin: 2px 4px 0 0;
  font-size: 0.85em;
}
.dim { color: #999; font-size: 0.85em; }
</style>
</head>
<body>
"#,
    );

    let last = summary
        .last_upload
        .as_ref()
        .map(timestamp)
        .unwrap_or_else(|| "never".to_string());

    out.push_str("<div class=\"section\">\n<h1>Platform Insight</h1>\n");
    out.push_str(&format!(
        "<p><strong>Total uploads:</strong> {}</p>\n",
        summary.total
    ));
    out.push_str(&format!("<p><strong>Last upload:</strong> {last}</p>\n</div>\n"));

    out.push_str(&format!(
        "<div class=\"section\">\n<h2>Last {} uploads</h2>\n",
        summary.recent.len()
    ));
    if summary.recent.is_empty() {
        out.push_str("<p class=\"dim\">No uploads yet.</p>\n");
    } else {
        out.push_str("<ul>\n");
        for event in &summary.recent {
            write_event(&mut out, event);
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</div>\n</body>\n</html>\n");
    out
}
