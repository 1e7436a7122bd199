//! Classification of inbound chat text.

use crate::AnalysisRequest;

/// Transport-neutral view of one inbound text message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inbound {
    pub text: String,
    /// First name of the sender, used in greetings.
    pub sender_name: Option<String>,
}

impl Inbound {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), sender_name: None }
    }

    pub fn with_sender(mut self, name: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self
    }
}

/// What the bot should do with an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/start` or `/help`.
    Greeting { name: Option<String> },
    /// A link to analyze.
    Analyze(AnalysisRequest),
    /// Text that is neither a command nor a link.
    NotAUrl,
    /// A command this bot does not handle.
    Ignore,
}

/// True when `text` starts with `http://` or `https://` (case-sensitive).
pub fn is_url(text: &str) -> bool {
    text.starts_with("http://") || text.starts_with("https://")
}

/// Routes an inbound message.
pub fn route(inbound: &Inbound) -> Route {
    if is_url(&inbound.text) {
        return Route::Analyze(AnalysisRequest::new(inbound.text.trim_end()));
    }

    let text = inbound.text.trim();

    if let Some(command) = text.strip_prefix('/') {
        let name = command.split_whitespace().next().unwrap_or_default();
        let name = name.split('@').next().unwrap_or_default();
        return match name {
            "start" | "help" => Route::Greeting { name: inbound.sender_name.clone() },
            _ => Route::Ignore,
        };
    }

    Route::NotAUrl
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com/article", true)]
    #[case("http://example.com", true)]
    #[case("HTTPS://example.com", false)]
    #[case("example.com", false)]
    #[case("ftp://example.com", false)]
    #[case("not a url", false)]
    fn test_is_url(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_url(text), expected);
    }

    #[test]
    fn test_route_url() {
        let route = route(&Inbound::new("https://example.com/a\n"));
        assert_eq!(route, Route::Analyze(AnalysisRequest::new("https://example.com/a")));
    }

    #[test]
    fn test_route_url_must_start_the_message() {
        assert_eq!(route(&Inbound::new("  https://example.com/a")), Route::NotAUrl);
    }

    #[test]
    fn test_route_not_a_url() {
        assert_eq!(route(&Inbound::new("not a url")), Route::NotAUrl);
        assert_eq!(route(&Inbound::new("look at https://example.com")), Route::NotAUrl);
    }

    #[rstest]
    #[case("/start")]
    #[case("/help")]
    #[case("/start@corrector_bot")]
    #[case("/start deep-link-payload")]
    fn test_route_greeting(#[case] text: &str) {
        let inbound = Inbound::new(text).with_sender("Olena");
        assert_eq!(route(&inbound), Route::Greeting { name: Some("Olena".to_string()) });
    }

    #[test]
    fn test_route_unknown_command() {
        assert_eq!(route(&Inbound::new("/settings")), Route::Ignore);
        assert_eq!(route(&Inbound::new("/")), Route::Ignore);
    }
}
