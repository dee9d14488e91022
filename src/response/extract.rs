//! Spoken-text extraction and normalization.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

// A `<` followed by whitespace is literal text, not the start of a tag.
static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:[^\s>][^>]*)?>").expect("valid regex"));
static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").expect("valid regex"));
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +([.,;!()/])").expect("valid regex"));

/// Which rendering of the spoken response an assertion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Markup removed.
    Plain,
    /// Markup kept as returned by the handler.
    Ssml,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain text"),
            Self::Ssml => write!(f, "ssml"),
        }
    }
}

/// Spoken response and reprompt of one turn, ready for comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpokenText {
    pub speech: String,
    pub reprompt: String,
}

/// Pull the spoken text out of a handler result.
///
/// Missing `response` or speech fields yield empty strings.
#[must_use]
pub fn spoken_text(result: &Value, kind: OutputKind, fix: bool) -> SpokenText {
    let Some(response) = result.get("response") else {
        return SpokenText::default();
    };

    let speech = output_speech(response.get("outputSpeech"));
    let reprompt = output_speech(response.get("reprompt").and_then(|r| r.get("outputSpeech")));

    SpokenText {
        speech: speech.map(|s| normalize(s, kind, fix)).unwrap_or_default(),
        reprompt: reprompt.map(|s| normalize(s, kind, fix)).unwrap_or_default(),
    }
}

fn output_speech(speech: Option<&Value>) -> Option<&str> {
    let speech = speech?;
    speech
        .get("ssml")
        .and_then(Value::as_str)
        .or_else(|| speech.get("text").and_then(Value::as_str))
}

fn normalize(text: &str, kind: OutputKind, fix: bool) -> String {
    let text = match kind {
        OutputKind::Plain => strip_tags(text),
        OutputKind::Ssml => text.to_string(),
    };
    if fix { fix_spaces(&text) } else { text }
}

/// Remove every `<...>` markup tag.
///
/// A lone `<` followed by whitespace, such as `3 < 5`, is kept as text.
#[must_use]
pub fn strip_tags(text: &str) -> String {
    MARKUP_TAG.replace_all(text, "").into_owned()
}

/// Collapse space runs, drop spaces before punctuation and trim the ends.
#[must_use]
pub fn fix_spaces(text: &str) -> String {
    let collapsed = SPACE_RUN.replace_all(text, " ");
    let tightened = SPACE_BEFORE_PUNCT.replace_all(&collapsed, "$1");
    tightened.trim_matches(' ').to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plain_strips_break_tag_and_fixes_spacing() {
        let result = json!({"response": {"outputSpeech": {"text": "Hello <break/> there"}}});
        let text = spoken_text(&result, OutputKind::Plain, true);
        assert_eq!(text.speech, "Hello there");
        assert_eq!(text.reprompt, "");
    }

    #[test]
    fn ssml_is_preferred_over_text() {
        let result = json!({"response": {
            "outputSpeech": {"ssml": "<speak>Hi</speak>", "text": "ignored"},
            "reprompt": {"outputSpeech": {"ssml": "<speak>Still there?</speak>"}}
        }});
        let text = spoken_text(&result, OutputKind::Ssml, false);
        assert_eq!(text.speech, "<speak>Hi</speak>");
        assert_eq!(text.reprompt, "<speak>Still there?</speak>");

        let plain = spoken_text(&result, OutputKind::Plain, false);
        assert_eq!(plain.speech, "Hi");
        assert_eq!(plain.reprompt, "Still there?");
    }

    #[test]
    fn missing_response_yields_empty_text() {
        assert_eq!(spoken_text(&json!({}), OutputKind::Plain, true), SpokenText::default());
        assert_eq!(
            spoken_text(&json!({"response": {}}), OutputKind::Ssml, false),
            SpokenText::default()
        );
    }

    #[test]
    fn strip_tags_keeps_comparison_signs() {
        assert_eq!(strip_tags("<speak>3 < 5 and 6 > 4</speak>"), "3 < 5 and 6 > 4");
        assert_eq!(strip_tags("a <> b"), "a  b");
        assert_eq!(strip_tags("x <break time=\"1s\"/> y"), "x  y");
    }

    #[test]
    fn fix_spaces_handles_punctuation_and_edges() {
        assert_eq!(fix_spaces("  Hello ,   world !  "), "Hello, world!");
        assert_eq!(fix_spaces("a ( b ) / c"), "a( b)/ c");
        assert_eq!(fix_spaces("no change."), "no change.");
    }

    #[test]
    fn fix_spaces_only_touches_spaces() {
        assert_eq!(fix_spaces("tab\there"), "tab\there");
    }

    #[test]
    fn output_kind_display() {
        assert_eq!(OutputKind::Plain.to_string(), "plain text");
        assert_eq!(OutputKind::Ssml.to_string(), "ssml");
    }
}
