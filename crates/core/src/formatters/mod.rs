pub mod escape;
pub mod replies;
pub mod report;

pub use escape::{escape_html, escape_markdown};
pub use report::{FormatConfig, MAX_RENDERED_MATCHES, ReportFormatter, SEGMENT_SEPARATOR, format_report};
