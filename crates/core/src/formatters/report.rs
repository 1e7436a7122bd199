//! Issue report rendering and pagination.
//!
//! A report is a header message, one or more HTML body messages holding the
//! rendered matches, and an optional trailer counting matches that were left
//! out. Every match becomes one segment and a segment is never split across
//! messages.
//!
//! # Example
//!
//! ```rust
//! use corrector_core::{GrammarMatch, RenderMode, format_report};
//!
//! let matches = vec![GrammarMatch::new("Teh cat sat.", 0, 3, "Possible typo").with_replacements(["The"])];
//! let messages = format_report("Cats", &matches);
//!
//! assert_eq!(messages.len(), 2);
//! assert_eq!(messages[0].render_mode, RenderMode::Markdown);
//! assert!(messages[1].body.contains("<b>Teh</b>"));
//! ```

use crate::formatters::escape::{clip_chars, clip_chars_front, escape_html, escape_markdown};
use crate::formatters::replies;
use crate::{GrammarMatch, MAX_MESSAGE_SIZE, OutboundMessage, message_len};

/// Separator placed between segments sharing one message.
pub const SEGMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Number of matches rendered in full.
pub const MAX_RENDERED_MATCHES: usize = 15;

/// Longest title (in characters) shown in the header.
pub(crate) const MAX_TITLE_CHARS: usize = 512;

/// Context windows tried, widest first, when a segment is too long.
const CONTEXT_WINDOWS: [usize; 3] = [120, 40, 0];

/// Configuration for report formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// Per-message size cap in UTF-16 code units.
    pub max_message_size: usize,

    /// Matches beyond this count are only summarized.
    pub max_rendered_matches: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { max_message_size: MAX_MESSAGE_SIZE, max_rendered_matches: MAX_RENDERED_MATCHES }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SegmentLimits {
    /// Characters of sentence kept on each side of the error.
    context: Option<usize>,
    /// Characters kept of the error span, message and suggestion.
    field: Option<usize>,
}

/// Turns grammar matches into size-limited chat messages.
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    config: FormatConfig,
}

impl ReportFormatter {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Builds the full message sequence for an article.
    ///
    /// With no matches this is a single success message.
    pub fn format(&self, title: &str, matches: &[GrammarMatch]) -> Vec<OutboundMessage> {
        if matches.is_empty() {
            return vec![replies::no_issues(title)];
        }

        let shown = matches.len().min(self.config.max_rendered_matches);
        let segments = matches[..shown].iter().map(|m| self.render_segment(m)).collect();

        let mut messages = vec![self.header(title, matches.len())];
        messages.extend(self.paginate(segments));

        let overflow = matches.len() - shown;
        if overflow > 0 {
            messages.push(replies::more_issues(overflow));
        }

        messages
    }

    /// Header announcing the total number of issues.
    pub fn header(&self, title: &str, total: usize) -> OutboundMessage {
        let title = if title.trim().is_empty() { "untitled" } else { title.trim() };
        OutboundMessage::markdown(format!(
            "🔍 Found *{}* issues in article *{}*",
            total,
            escape_markdown(&clip_chars(title, MAX_TITLE_CHARS))
        ))
    }

    /// Renders one match as an HTML segment no longer than the message cap.
    ///
    /// Oversized segments are re-rendered with less sentence context and,
    /// as a last resort, with clipped fields.
    pub fn render_segment(&self, m: &GrammarMatch) -> String {
        let cap = self.config.max_message_size;

        let full = render_with_limits(m, SegmentLimits::default());
        if message_len(&full) <= cap {
            return full;
        }

        for window in CONTEXT_WINDOWS {
            let segment = render_with_limits(m, SegmentLimits { context: Some(window), field: None });
            if message_len(&segment) <= cap {
                return segment;
            }
        }

        let segment = render_with_limits(m, SegmentLimits { context: Some(0), field: Some((cap / 32).max(1)) });
        if message_len(&segment) > cap {
            tracing::warn!(len = message_len(&segment), cap, "segment exceeds message size after clipping");
        }
        segment
    }

    /// Packs segments into as few messages as the cap allows, keeping order.
    pub fn paginate(&self, segments: Vec<String>) -> Vec<OutboundMessage> {
        let cap = self.config.max_message_size;
        let separator_len = message_len(SEGMENT_SEPARATOR);

        let mut messages = Vec::new();
        let mut buffer = String::new();
        let mut buffer_len = 0;

        for segment in segments {
            let segment_len = message_len(&segment);

            if buffer.is_empty() {
                buffer = segment;
                buffer_len = segment_len;
            } else if buffer_len + separator_len + segment_len > cap {
                messages.push(OutboundMessage::html(std::mem::take(&mut buffer)));
                buffer = segment;
                buffer_len = segment_len;
            } else {
                buffer.push_str(SEGMENT_SEPARATOR);
                buffer.push_str(&segment);
                buffer_len += separator_len + segment_len;
            }
        }

        if !buffer.is_empty() {
            messages.push(OutboundMessage::html(buffer));
        }

        messages
    }
}

/// Formats a report with the default configuration.
pub fn format_report(title: &str, matches: &[GrammarMatch]) -> Vec<OutboundMessage> {
    ReportFormatter::default().format(title, matches)
}

fn render_with_limits(m: &GrammarMatch, limits: SegmentLimits) -> String {
    let chars: Vec<char> = m.sentence.chars().collect();
    let start = m.offset_in_sentence.min(chars.len());
    let end = start.saturating_add(m.error_length).min(chars.len());

    let mut before: String = chars[..start].iter().collect();
    let mut error: String = chars[start..end].iter().collect();
    let mut after: String = chars[end..].iter().collect();
    let mut message = m.message.clone();
    let mut suggestion = m.suggestion().map(str::to_string);

    if let Some(window) = limits.context {
        before = clip_chars_front(&before, window);
        after = clip_chars(&after, window);
    }

    if let Some(field) = limits.field {
        error = clip_chars(&error, field);
        message = clip_chars(&message, field);
        suggestion = suggestion.map(|s| clip_chars(&s, field));
    }

    let highlighted = if error.is_empty() {
        format!("{}{}", escape_html(&before), escape_html(&after))
    } else {
        format!("{}<b>{}</b>{}", escape_html(&before), escape_html(&error), escape_html(&after))
    };

    let mut segment = format!(
        "📖 <b>Sentence:</b>\n<i>«{}»</i>\n🚫 <b>Problem:</b> {}",
        highlighted,
        escape_html(&message)
    );

    if let Some(suggestion) = suggestion {
        segment.push_str(&format!("\n💡 <b>Suggestion:</b> <code>{}</code>", escape_html(&suggestion)));
    }

    segment
}
