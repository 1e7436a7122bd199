//! Canned replies sent to the user outside of the issue report itself.

use crate::formatters::escape::{clip_chars, escape_html};
use crate::formatters::report::MAX_TITLE_CHARS;
use crate::{FetchErrorKind, OutboundMessage};

/// Answer to `/start` and `/help`.
pub fn greeting(name: Option<&str>) -> OutboundMessage {
    let salutation = match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("Hi, {}!", escape_html(name)),
        None => "Hi!".to_string(),
    };
    OutboundMessage::html(format!(
        "{}\n\nSend me a link (URL) to any article and I will try to find mistakes in it.",
        salutation
    ))
}

pub fn not_a_url() -> OutboundMessage {
    OutboundMessage::plain("Please send me a full link (URL) that starts with http:// or https://")
}

pub fn analysis_started() -> OutboundMessage {
    OutboundMessage::plain("Got the link. Starting analysis... 🧐\nThis may take up to a minute.")
}

pub fn empty_content() -> OutboundMessage {
    OutboundMessage::plain(
        "Could not extract the article text from this link. 😥\n\
         The site may block scraping or have an unusual structure.",
    )
}

pub fn fetch_failed(kind: FetchErrorKind) -> OutboundMessage {
    match kind {
        FetchErrorKind::RetrievalFailed => {
            OutboundMessage::plain("Could not download the article from this link. Please check the URL.")
        }
        FetchErrorKind::ParseFailed => {
            OutboundMessage::plain("Could not download the article from this link: the page does not look like an article.")
        }
    }
}

pub fn timed_out() -> OutboundMessage {
    OutboundMessage::plain("The analysis took too long and was stopped. Please try again later.")
}

pub fn unexpected_error() -> OutboundMessage {
    OutboundMessage::plain("Sorry, an unexpected error occurred while analyzing the article.")
}

/// Sent instead of a report when the checker found nothing.
pub fn no_issues(title: &str) -> OutboundMessage {
    OutboundMessage::plain(format!("✅ Great! No issues found in the article \"{}\".", clip_chars(title, MAX_TITLE_CHARS)))
}

/// Trailer for matches that did not fit in the report.
pub fn more_issues(count: usize) -> OutboundMessage {
    OutboundMessage::plain(format!("... and {} more issues.", count))
}
