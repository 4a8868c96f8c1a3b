//! Property-based tests for request normalization and rule evaluation

use hookwire_hooks::*;
use proptest::prelude::*;
use serde_json::json;

proptest! {
    /// Multi-valued query parameters collapse to their first value
    #[test]
    fn prop_query_collapses_to_first(key in "[a-z]{1,8}", values in prop::collection::vec("[a-z0-9]{1,8}", 1..5)) {
        let query = values
            .iter()
            .map(|value| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");
        let context = RequestContext::from_parts(Vec::<(String, String)>::new(), Some(&query), Vec::new());
        prop_assert_eq!(context.query.get(&key), Some(&json!(values[0])));
        prop_assert_eq!(context.query.len(), 1);
    }

    /// Header names are matched case-insensitively by argument extraction
    #[test]
    fn prop_header_lookup_ignores_case(name in "[A-Za-z][A-Za-z-]{0,10}", value in "[a-z0-9]{1,10}") {
        let context = RequestContext::from_parts(vec![(name.clone(), value.clone())], None, Vec::new());
        let upper = Argument::header(name.to_ascii_uppercase());
        let lower = Argument::header(name.to_ascii_lowercase());
        prop_assert_eq!(extract_parameter(&upper, &context), Some(value.clone()));
        prop_assert_eq!(extract_parameter(&lower, &context), Some(value));
    }

    /// A value rule accepts exactly its own value
    #[test]
    fn prop_value_rule_matches_only_equal(actual in "[a-z]{1,6}", expected in "[a-z]{1,6}") {
        let query = format!("branch={}", actual);
        let context = RequestContext::from_parts(Vec::<(String, String)>::new(), Some(&query), Vec::new());
        let rule = TriggerRule::value(Argument::query("branch"), expected.clone());
        prop_assert_eq!(rule.evaluate(&context), actual == expected);
        prop_assert_eq!(TriggerRule::not(rule).evaluate(&context), actual != expected);
    }
}

#[test]
fn test_query_a_first_value() {
    let context = RequestContext::from_parts(Vec::<(&str, &str)>::new(), Some("a=1&a=2"), Vec::new());
    assert_eq!(serde_json::Value::Object(context.query), json!({"a": "1"}));
}

#[test]
fn test_json_header_is_decoded() {
    let context = RequestContext::from_parts(vec![("X-Data", r#"{"x":1}"#)], None, Vec::new());
    assert_eq!(context.headers.get("x-data"), Some(&json!({"x": 1})));
}

#[test]
fn test_decoded_json_addressable_by_path() {
    let context = RequestContext::from_parts(
        vec![("Content-Type", "application/x-www-form-urlencoded")],
        None,
        br#"payload=%7B%22ref%22%3A%22refs%2Fheads%2Fmain%22%7D"#.to_vec(),
    );
    let rule = TriggerRule::value(Argument::payload("payload.ref"), "refs/heads/main");
    assert!(rule.evaluate(&context));
}

#[test]
fn test_malformed_json_body_still_builds_context() {
    let context = RequestContext::from_parts(
        vec![("Content-Type", "application/json")],
        Some("msg=hi"),
        b"{broken".to_vec(),
    );
    assert!(context.payload.is_none());
    assert_eq!(context.raw_body, b"{broken".to_vec());
    assert_eq!(context.query.get("msg"), Some(&json!("hi")));
}

#[test]
fn test_rule_tree_from_yaml_definition() {
    let hooks = ConfigLoader::parse_yaml(
        r#"
- id: deploy
  execute-command: /bin/deploy
  trigger-rule:
    and:
      - match:
          type: value
          value: push
          parameter:
            source: header
            name: X-Event
      - match:
          type: regex
          regex: "^refs/heads/(main|release/.*)$"
          parameter:
            source: payload
            name: ref
"#,
    )
    .unwrap();

    let rule = hooks[0].trigger_rule.as_ref().unwrap();
    let matching = RequestContext::from_parts(
        vec![("X-Event", "push"), ("Content-Type", "application/json")],
        None,
        br#"{"ref": "refs/heads/release/1.0"}"#.to_vec(),
    );
    let other = RequestContext::from_parts(
        vec![("X-Event", "push"), ("Content-Type", "application/json")],
        None,
        br#"{"ref": "refs/heads/feature"}"#.to_vec(),
    );
    assert!(rule.evaluate(&matching));
    assert!(!rule.evaluate(&other));
}

#[test]
fn test_payload_numbers_reach_arguments_verbatim() {
    let hook = HookDefinition::new("numbers", "echo")
        .with_argument(Argument::payload("big"))
        .with_argument(Argument::payload("price"))
        .with_argument(Argument::payload("nested.ratio"));
    let context = RequestContext::from_parts(
        vec![("Content-Type", "application/json")],
        None,
        br#"{"big": 123456789012345678901234567890, "price": 1.10, "nested": {"ratio": 2.50}}"#
            .to_vec(),
    );

    assert_eq!(
        extract_arguments(&hook, &context),
        vec![
            "123456789012345678901234567890".to_string(),
            "1.10".to_string(),
            "2.50".to_string(),
        ]
    );
}
