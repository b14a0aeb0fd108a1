//! Tests for core types.

use pretty_assertions::assert_eq;
use concierge::types::*;
use serde_json::json;

#[test]
fn model_message_constructors_set_role_and_text() {
    let cases = [
        (ModelMessage::system("You are helpful."), Role::System),
        (ModelMessage::user("Hello"), Role::User),
        (ModelMessage::assistant("Hi there!"), Role::Assistant),
    ];
    for (msg, role) in cases {
        assert_eq!(msg.role, role);
        assert!(!msg.text().is_empty());
        assert!(msg.timestamp.is_some());
    }
}

#[test]
fn tool_result_message_exposes_result_part() {
    let msg = ModelMessage::tool_result("call_1", json!("State updated successfully"), false);
    assert_eq!(msg.role, Role::Tool);
    let part = msg.tool_result_part().unwrap();
    assert_eq!(part.tool_call_id, "call_1");
    assert_eq!(part.as_text(), "State updated successfully");
}

#[test]
fn tool_result_text_serializes_structured_values() {
    let result = AgentToolResult {
        tool_call_id: "call_2".into(),
        result: json!({"error": "boom"}),
        is_error: true,
    };
    assert_eq!(result.as_text(), r#"{"error":"boom"}"#);
}

#[test]
fn assistant_tool_calls_skip_empty_text() {
    let call = AgentToolCall {
        id: "call_1".into(),
        name: "search_venue".into(),
        arguments: json!({}),
    };
    let msg = ModelMessage::assistant_tool_calls("", &[call.clone()]);
    assert_eq!(msg.content.len(), 1);
    assert_eq!(msg.tool_calls(), vec![&call]);
    assert_eq!(msg.text(), "");
}

#[test]
fn model_message_serde_uses_tagged_parts() {
    let msg = ModelMessage::user("test");
    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value["role"], "user");
    assert_eq!(value["content"][0]["type"], "text");
    let back: ModelMessage = serde_json::from_value(value).unwrap();
    assert_eq!(back.text(), "test");
}

#[test]
fn usage_merge() {
    let mut u1 = Usage {
        input_tokens: 10,
        output_tokens: 20,
        total_tokens: 30,
    };
    u1.merge(&Usage {
        input_tokens: 5,
        output_tokens: 15,
        total_tokens: 20,
    });
    assert_eq!(u1.input_tokens, 15);
    assert_eq!(u1.output_tokens, 35);
    assert_eq!(u1.total_tokens, 50);
}

#[test]
fn generation_settings_builder() {
    let settings = GenerationSettings::builder()
        .max_tokens(1000)
        .temperature(0.0)
        .build();
    assert_eq!(settings.max_tokens, Some(1000));
    assert_eq!(settings.temperature, Some(0.0));
    assert!(settings.top_p.is_none());
}

#[test]
fn finish_reason_round_trips_through_strings() {
    use std::str::FromStr;
    assert_eq!(FinishReason::ToolCalls.to_string(), "tool_calls");
    assert_eq!(FinishReason::from_str("length").unwrap(), FinishReason::Length);
    assert!(FinishReason::from_str("unknown").is_err());
}
