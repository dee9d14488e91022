use proptest::prelude::*;

use converse::response::{FuzzySet, Polarity, approximates, fix_spaces, strip_tags};

proptest! {
    #[test]
    fn test_strip_tags_leaves_no_tags(text in "[a-z <>/=\"]{0,64}") {
        let stripped = strip_tags(&text);
        for (open, _) in stripped.match_indices('<') {
            let rest = &stripped[open + 1..];
            let literal = rest.starts_with(char::is_whitespace) || !rest.contains('>');
            prop_assert!(literal, "{stripped:?}");
        }
        prop_assert_eq!(strip_tags(&stripped), stripped.clone());
    }

    #[test]
    fn test_strip_tags_keeps_spaced_angle_brackets(a in "[a-z0-9]{1,8}", b in "[a-z0-9]{1,8}") {
        let text = format!("{a} < {b} > {a}");
        prop_assert_eq!(strip_tags(&format!("<speak>{text}</speak>")), text);
    }

    #[test]
    fn test_fix_spaces_idempotent(text in "[a-z .,;!()/]{0,64}") {
        let once = fix_spaces(&text);
        prop_assert_eq!(fix_spaces(&once), once.clone());
        prop_assert!(!once.contains("  "));
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
    }

    #[test]
    fn test_fuzzy_self_match_scores_one(text in "[a-zA-Z ]{1,40}") {
        let set = FuzzySet::new([text.as_str()]);
        prop_assert_eq!(set.best_score(&text), Some(1.0));
    }

    #[test]
    fn test_should_not_is_inverse(actual in "[a-z ]{1,24}", expected in "[a-z ]{1,24}", threshold in 0.0f64..=1.0) {
        let should = approximates(Polarity::Should, &actual, &expected, threshold);
        let should_not = approximates(Polarity::ShouldNot, &actual, &expected, threshold);
        prop_assert_eq!(should.matched, !should_not.matched);
        prop_assert_eq!(should.score, should_not.score);
    }
}
