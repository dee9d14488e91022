use converse::config::ConversationConfig;
use converse::request::{RequestBuilder, SlotValue, Slots};
use serde_json::json;

fn builder() -> RequestBuilder {
    RequestBuilder::new(ConversationConfig::new("amzn1.ask.skill.unit"))
}

#[test]
fn wire_shape_uses_platform_keys() {
    let request = builder()
        .build("Greet", &Slots::from([("name", "Ada")]), None)
        .expect("build");
    let wire = request.to_json().expect("serialize");

    assert_eq!(wire["version"], "1.0");
    assert_eq!(wire["session"]["new"], true);
    assert_eq!(wire["session"]["application"]["applicationId"], "amzn1.ask.skill.unit");
    assert_eq!(wire["request"]["type"], "IntentRequest");
    assert_eq!(wire["request"]["intent"]["name"], "Greet");
    assert_eq!(
        wire["request"]["intent"]["slots"]["name"],
        json!({"name": "name", "value": "Ada"})
    );
    assert!(wire["context"]["System"].is_object());
}

#[test]
fn structured_slot_name_is_overridden() {
    let mut fields = serde_json::Map::new();
    fields.insert("name".to_string(), json!("ignored"));
    fields.insert("value".to_string(), json!("Oslo"));
    fields.insert("resolutions".to_string(), json!({"count": 1}));
    let slots = Slots::new().with("city", SlotValue::Structured(fields));

    let request = builder().build("Travel", &slots, None).expect("build");
    let city = &request.request.intent.slots["city"];
    assert_eq!(city["name"], "city");
    assert_eq!(city["value"], "Oslo");
    assert_eq!(city["resolutions"]["count"], 1);
}

#[test]
fn timestamp_is_utc_with_milliseconds() {
    let request = builder().build("Greet", &Slots::new(), None).expect("build");
    let timestamp = &request.request.timestamp;
    assert!(timestamp.ends_with('Z'), "{timestamp}");
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    let fraction = timestamp.rsplit('.').next().expect("fraction");
    assert_eq!(fraction.len(), 4, "three digits plus Z: {timestamp}");
}

#[test]
fn attributes_follow_prior_result() {
    let mut builder = builder();
    let prior = json!({"sessionAttributes": {"step": 2, "seen": ["Greet"]}});
    let request = builder.build("Continue", &Slots::new(), Some(&prior)).expect("build");
    assert_eq!(request.session.attributes["step"], 2);

    let null_prior = json!({"sessionAttributes": null});
    let request = builder.build("Continue", &Slots::new(), Some(&null_prior)).expect("build");
    assert!(request.session.attributes.is_empty());

    let string_prior = json!({"sessionAttributes": "oops"});
    let request = builder.build("Continue", &Slots::new(), Some(&string_prior)).expect("build");
    assert!(request.session.attributes.is_empty());
}

#[test]
fn slots_from_json_accept_strings_and_objects() {
    let slots = Slots::from_json(json!({"topic": "weather", "city": {"value": "Oslo"}})).expect("slots");
    assert_eq!(slots.len(), 2);
    assert!(matches!(slots.get("topic"), Some(SlotValue::Scalar(v)) if v == "weather"));
    assert!(Slots::from_json(json!(["not", "an", "object"])).is_err());
}
