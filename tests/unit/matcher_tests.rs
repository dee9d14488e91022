use converse::response::{
    FuzzySet, OutputKind, Polarity, approximates, fix_spaces, spoken_text, strip_tags,
};
use converse::test_utils::{TableCase, run_table_tests};
use serde_json::json;

#[test]
fn plain_extraction_table() -> Result<(), String> {
    let cases = vec![
        TableCase {
            name: "break tag",
            input: ("<speak>Hello <break time=\"1s\"/> there</speak>", true),
            expected: "Hello there".to_string(),
        },
        TableCase {
            name: "space before punctuation",
            input: ("<speak>Hi <emphasis>Ada</emphasis> !</speak>", true),
            expected: "Hi Ada!".to_string(),
        },
        TableCase {
            name: "no fixing keeps spacing",
            input: ("<speak>Hello <break/> there</speak>", false),
            expected: "Hello  there".to_string(),
        },
        TableCase {
            name: "comparison signs are spoken text",
            input: ("<speak>3 < 5 and 6 > 4</speak>", true),
            expected: "3 < 5 and 6 > 4".to_string(),
        },
    ];

    run_table_tests(cases, |(ssml, fix)| {
        let result = json!({"response": {"outputSpeech": {"ssml": ssml}}});
        spoken_text(&result, OutputKind::Plain, fix).speech
    })
}

#[test]
fn ssml_output_is_untouched() {
    let result = json!({"response": {"outputSpeech": {"ssml": "<speak>Hi</speak>"}}});
    assert_eq!(spoken_text(&result, OutputKind::Ssml, false).speech, "<speak>Hi</speak>");
}

#[test]
fn text_fallback_and_missing_response() {
    let text_only = json!({"response": {"outputSpeech": {"text": "Plain words"}}});
    assert_eq!(spoken_text(&text_only, OutputKind::Plain, true).speech, "Plain words");

    let empty = spoken_text(&json!({}), OutputKind::Plain, true);
    assert_eq!(empty.speech, "");
    assert_eq!(empty.reprompt, "");
}

#[test]
fn contain_check_sees_text_after_lone_angle_bracket() {
    let result = json!({"response": {"outputSpeech": {"ssml": "<speak>3 < 5</speak>"}}});
    assert!(spoken_text(&result, OutputKind::Plain, true).speech.contains('5'));
}

#[test]
fn helpers_compose() {
    assert_eq!(fix_spaces(&strip_tags("a <b>bold</b> , move")), "a bold, move");
}

#[test]
fn fuzzy_scores_rank_closest_first() {
    let set = FuzzySet::new(["Good morning", "Good night", "Goodbye"]);
    let matches = set.get("good mornin", 0.33).expect("matches");
    assert_eq!(matches[0].1, "Good morning");
    assert!(matches[0].0 > 0.9);
}

#[test]
fn approximate_outcomes_report_scores() {
    let pass = approximates(Polarity::Should, "Hello there", "Hello ther", 0.90);
    assert!(pass.matched);
    let inverse = approximates(Polarity::ShouldNot, "Hello there", "Hello ther", 0.90);
    assert!(!inverse.matched);
    assert_eq!(pass.score, inverse.score);
}
