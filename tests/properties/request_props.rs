use proptest::prelude::*;

use converse::config::ConversationConfig;
use converse::request::{RequestBuilder, Slots};
use serde_json::json;

proptest! {
    #[test]
    fn test_only_first_request_is_new(turns in 1usize..8) {
        let mut builder = RequestBuilder::new(ConversationConfig::new("amzn1.ask.skill.prop"));
        for turn in 0..turns {
            let request = builder.build("Step", &Slots::new(), None).expect("build");
            prop_assert_eq!(request.session.is_new, turn == 0);
        }
    }

    #[test]
    fn test_attributes_copied_verbatim(key in "[a-z]{1,8}", value in any::<i64>()) {
        let mut builder = RequestBuilder::new(ConversationConfig::new("amzn1.ask.skill.prop"));
        let prior = json!({"sessionAttributes": {key.clone(): value}});
        let request = builder.build("Step", &Slots::new(), Some(&prior)).expect("build");
        prop_assert_eq!(request.session.attributes.len(), 1);
        prop_assert_eq!(&request.session.attributes[&key], &json!(value));
    }

    #[test]
    fn test_slot_names_always_win(name in "[a-z]{1,8}", value in "[a-zA-Z ]{0,16}") {
        let slots = Slots::new().with(name.clone(), value.as_str());
        let materialized = slots.materialize();
        prop_assert_eq!(&materialized[&name]["name"], &json!(name));
        prop_assert_eq!(&materialized[&name]["value"], &json!(value));
    }
}
