pub mod dashboard;
pub mod export;
pub mod types;

pub use dashboard::render_dashboard;
pub use export::{render_report, report_filename, write_report};
pub use types::{ReportError, ReportFormat, ReportInput};
