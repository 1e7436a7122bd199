//! LanguageTool HTTP client.
//!
//! Talks to a LanguageTool server (self-hosted or the public API) through its
//! `/v2/languages` and `/v2/check` endpoints.
//!
//! LanguageTool reports offsets in UTF-16 code units relative to the whole
//! submitted text. [`GrammarMatch`] wants `char` offsets relative to the
//! sentence, so each match is located inside the text and converted here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use url::Url;

use crate::{CheckError, GrammarChecker, GrammarMatch, InitError};

/// Connection settings for a LanguageTool server.
#[derive(Debug, Clone)]
pub struct LanguageToolConfig {
    /// API root, e.g. `http://localhost:8081/v2`.
    pub base_url: String,
    /// Language code to check in, e.g. `uk-UA`.
    pub language: String,
    /// Per-call timeout in seconds.
    pub timeout: u64,
}

impl Default for LanguageToolConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:8081/v2".to_string(), language: "uk-UA".to_string(), timeout: 60 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    pub name: String,
    pub code: String,
    pub long_code: String,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    message: String,
    #[serde(default)]
    replacements: Vec<RawReplacement>,
    offset: usize,
    length: usize,
    context: RawContext,
    #[serde(default)]
    sentence: Option<String>,
    #[serde(default)]
    rule: Option<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawReplacement {
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawContext {
    text: String,
    offset: usize,
    length: usize,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    id: String,
}

/// [`GrammarChecker`] backed by a LanguageTool server.
///
/// The underlying HTTP client is shareable, so one instance serves all
/// requests concurrently.
#[derive(Debug)]
pub struct LanguageToolChecker {
    client: Client,
    base_url: String,
    language: String,
    shut_down: AtomicBool,
}

impl LanguageToolChecker {
    /// Connects to the server and verifies that it serves the configured language.
    pub async fn initialize(config: LanguageToolConfig) -> Result<Self, InitError> {
        let base = Url::parse(&config.base_url).map_err(|e| InitError::InvalidUrl(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(InitError::InvalidUrl(format!("unsupported scheme: {}", base.scheme())));
        }

        let client = Client::builder().timeout(Duration::from_secs(config.timeout)).build()?;
        let checker = Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language,
            shut_down: AtomicBool::new(false),
        };

        let languages = checker.languages().await?;
        if !supports_language(&languages, &checker.language) {
            return Err(InitError::UnsupportedLanguage(checker.language));
        }

        tracing::info!(
            url = %checker.base_url,
            language = %checker.language,
            available = languages.len(),
            "LanguageTool checker initialized"
        );
        Ok(checker)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Lists the languages the server can check.
    pub async fn languages(&self) -> Result<Vec<LanguageInfo>, InitError> {
        let response = self.client.get(self.endpoint("languages")).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(InitError::Api { status: status.as_u16(), message: body });
        }

        decode_languages(&body)
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

#[async_trait]
impl GrammarChecker for LanguageToolChecker {
    async fn check(&self, text: &str) -> Result<Vec<GrammarMatch>, CheckError> {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(CheckError::ShutDown);
        }

        tracing::debug!(chars = text.chars().count(), language = %self.language, "checking text");

        let response: Response = self
            .client
            .post(self.endpoint("check"))
            .form(&[("language", self.language.as_str()), ("text", text)])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CheckError::Api { status: status.as_u16(), message: body });
        }

        decode_matches(text, &body)
    }

    async fn shutdown(&self) {
        if !self.shut_down.swap(true, Ordering::AcqRel) {
            tracing::info!(language = %self.language, "LanguageTool checker shut down");
        }
    }
}

fn supports_language(languages: &[LanguageInfo], wanted: &str) -> bool {
    wanted.eq_ignore_ascii_case("auto")
        || languages
            .iter()
            .any(|l| l.long_code.eq_ignore_ascii_case(wanted) || l.code.eq_ignore_ascii_case(wanted))
}

/// Decodes a `/v2/languages` response body.
pub fn decode_languages(body: &str) -> Result<Vec<LanguageInfo>, InitError> {
    serde_json::from_str(body).map_err(|e| InitError::Decode(e.to_string()))
}

/// Decodes a `/v2/check` response body for the submitted `text`.
pub fn decode_matches(text: &str, body: &str) -> Result<Vec<GrammarMatch>, CheckError> {
    let response: CheckResponse = serde_json::from_str(body).map_err(|e| CheckError::Decode(e.to_string()))?;

    Ok(response.matches.into_iter().map(|raw| convert_match(text, raw)).collect())
}

fn convert_match(text: &str, raw: RawMatch) -> GrammarMatch {
    let located = raw
        .sentence
        .as_deref()
        .and_then(|sentence| locate_in_sentence(text, sentence, raw.offset, raw.length).map(|pos| (sentence, pos)));

    let (sentence, offset_in_sentence, error_length) = match located {
        Some((sentence, (offset, length))) => (sentence.to_string(), offset, length),
        None => {
            let offset = utf16_to_char_offset(&raw.context.text, raw.context.offset);
            let end = utf16_to_char_offset(&raw.context.text, raw.context.offset + raw.context.length);
            (raw.context.text, offset, end - offset)
        }
    };

    GrammarMatch {
        sentence,
        offset_in_sentence,
        error_length,
        message: raw.message,
        replacements: raw.replacements.into_iter().map(|r| r.value).collect(),
        rule_id: raw.rule.map(|r| r.id),
    }
}

/// Finds the occurrence of `sentence` in `text` that covers the error starting
/// at UTF-16 offset `offset`, and returns the error's `(offset, length)` in
/// `char`s relative to that occurrence.
fn locate_in_sentence(text: &str, sentence: &str, offset: usize, length: usize) -> Option<(usize, usize)> {
    if sentence.is_empty() {
        return None;
    }

    let error_start = utf16_to_byte_offset(text, offset)?;
    let error_end = utf16_to_byte_offset(text, offset + length).unwrap_or(text.len());

    let (start, _) = text
        .match_indices(sentence)
        .find(|(start, s)| *start <= error_start && error_start <= start + s.len())?;

    let offset_in_sentence = text[start..error_start].chars().count();
    let error_length = text[error_start..error_end.max(error_start)].chars().count();
    Some((offset_in_sentence, error_length))
}

/// Converts a UTF-16 offset into a byte offset, or `None` past the end.
///
/// Offsets landing inside a surrogate pair round up to the next character.
fn utf16_to_byte_offset(text: &str, utf16_offset: usize) -> Option<usize> {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        if units >= utf16_offset {
            return Some(byte);
        }
        units += ch.len_utf16();
    }
    (units >= utf16_offset).then_some(text.len())
}

/// Converts a UTF-16 offset into a `char` offset, clamped to the text length.
fn utf16_to_char_offset(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (index, ch) in text.chars().enumerate() {
        if units >= utf16_offset {
            return index;
        }
        units += ch.len_utf16();
    }
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LANGUAGES: &str = r#"[
        {"name":"English (US)","code":"en","longCode":"en-US"},
        {"name":"Ukrainian","code":"uk","longCode":"uk-UA"}
    ]"#;

    fn check_body(matches: &str) -> String {
        format!(
            r#"{{"software":{{"name":"LanguageTool","version":"6.4"}},"language":{{"name":"Ukrainian","code":"uk-UA"}},"matches":[{}]}}"#,
            matches
        )
    }

    #[test]
    fn test_config_default() {
        let config = LanguageToolConfig::default();
        assert_eq!(config.language, "uk-UA");
        assert!(config.base_url.ends_with("/v2"));
    }

    #[test]
    fn test_decode_languages() {
        let languages = decode_languages(LANGUAGES).unwrap();
        assert_eq!(languages.len(), 2);
        assert_eq!(languages[1].long_code, "uk-UA");
        assert!(matches!(decode_languages("<html>"), Err(InitError::Decode(_))));
    }

    #[test]
    fn test_supports_language() {
        let languages = decode_languages(LANGUAGES).unwrap();
        assert!(supports_language(&languages, "uk-UA"));
        assert!(supports_language(&languages, "uk"));
        assert!(supports_language(&languages, "en-us"));
        assert!(supports_language(&languages, "auto"));
        assert!(!supports_language(&languages, "de-DE"));
    }

    #[test]
    fn test_decode_matches_in_second_sentence() {
        let text = "Перше речення. Друге речення з помилкою тут.";
        // "помилкою" starts at char 31 of the text, char 16 of the second sentence.
        let body = check_body(
            r#"{
                "message":"Можлива орфографічна помилка",
                "shortMessage":"",
                "replacements":[{"value":"помилкою"},{"value":"помилка"}],
                "offset":31,"length":8,
                "context":{"text":"...Друге речення з помилкою тут.","offset":20,"length":8},
                "sentence":"Друге речення з помилкою тут.",
                "rule":{"id":"MORFOLOGIK_RULE_UK_UA","description":"Spelling"}
            }"#,
        );

        let matches = decode_matches(text, &body).unwrap();
        assert_eq!(matches.len(), 1);

        let m = &matches[0];
        assert_eq!(m.sentence, "Друге речення з помилкою тут.");
        assert_eq!(m.offset_in_sentence, 16);
        assert_eq!(m.error_length, 8);
        assert_eq!(m.error_text(), "помилкою");
        assert_eq!(m.replacements, vec!["помилкою", "помилка"]);
        assert_eq!(m.rule_id.as_deref(), Some("MORFOLOGIK_RULE_UK_UA"));
    }

    #[test]
    fn test_decode_matches_picks_occurrence_covering_offset() {
        let text = "Це тест. Це тест.";
        // Second "тест" at char 12.
        let body = check_body(
            r#"{"message":"m","replacements":[],"offset":12,"length":4,
                "context":{"text":"Це тест. Це тест.","offset":12,"length":4},
                "sentence":"Це тест."}"#,
        );

        let m = &decode_matches(text, &body).unwrap()[0];
        assert_eq!(m.sentence, "Це тест.");
        assert_eq!(m.offset_in_sentence, 3);
        assert_eq!(m.error_text(), "тест");
    }

    #[test]
    fn test_decode_matches_falls_back_to_context() {
        let text = "Some text that was normalized by the server.";
        let body = check_body(
            r#"{"message":"m","replacements":[{"value":"fix"}],"offset":5,"length":4,
                "context":{"text":"Some text that was","offset":5,"length":4},
                "sentence":"A sentence not present in the text"}"#,
        );

        let m = &decode_matches(text, &body).unwrap()[0];
        assert_eq!(m.sentence, "Some text that was");
        assert_eq!(m.offset_in_sentence, 5);
        assert_eq!(m.error_text(), "text");
    }

    #[test]
    fn test_decode_matches_handles_astral_characters() {
        // The emoji is two UTF-16 units but one char.
        let text = "Hi 😀 teh end.";
        let body = check_body(
            r#"{"message":"typo","replacements":[{"value":"the"}],"offset":6,"length":3,
                "context":{"text":"Hi 😀 teh end.","offset":6,"length":3},
                "sentence":"Hi 😀 teh end."}"#,
        );

        let m = &decode_matches(text, &body).unwrap()[0];
        assert_eq!(m.offset_in_sentence, 5);
        assert_eq!(m.error_text(), "teh");
    }

    #[test]
    fn test_decode_matches_empty() {
        let matches = decode_matches("Чистий текст.", &check_body("")).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_decode_matches_rejects_garbage() {
        assert!(matches!(decode_matches("x", "not json"), Err(CheckError::Decode(_))));
    }

    #[test]
    fn test_utf16_offsets() {
        assert_eq!(utf16_to_byte_offset("abc", 0), Some(0));
        assert_eq!(utf16_to_byte_offset("abc", 3), Some(3));
        assert_eq!(utf16_to_byte_offset("abc", 4), None);
        assert_eq!(utf16_to_byte_offset("їa", 1), Some(2));
        assert_eq!(utf16_to_char_offset("😀a", 2), 1);
        assert_eq!(utf16_to_char_offset("ab", 10), 2);
    }

    #[tokio::test]
    async fn test_initialize_rejects_bad_url() {
        let config = LanguageToolConfig { base_url: "not a url".to_string(), ..Default::default() };
        assert!(matches!(LanguageToolChecker::initialize(config).await, Err(InitError::InvalidUrl(_))));

        let config = LanguageToolConfig { base_url: "ftp://example.com/v2".to_string(), ..Default::default() };
        assert!(matches!(LanguageToolChecker::initialize(config).await, Err(InitError::InvalidUrl(_))));
    }
}
