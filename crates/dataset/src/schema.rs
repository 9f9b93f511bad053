use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SkipReason;

pub type Hash32 = [u8; 32];

pub const SYSTEM_ROLE: &str = "system";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,       // free-form: system / user / assistant / ...
    pub content: String,
}

/// A record that passed structural validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub messages: Vec<Message>,
}

impl ChatRecord {
    pub fn has_system_message(&self) -> bool {
        self.messages.iter().any(|m| m.role == SYSTEM_ROLE)
    }
}

/// A parsed JSONL line that carries a `messages` key. Nothing else is checked yet.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    pub line: usize,
    pub value: Value,
}

impl RawRecord {
    /// Project the loosely-typed value onto `ChatRecord`.
    /// Unknown fields on the record or its messages are dropped.
    pub fn project(&self) -> Result<ChatRecord, SkipReason> {
        let messages = match self.value.get("messages") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(SkipReason::NotAnArray),
            None => return Err(SkipReason::MissingMessages),
        };
        if messages.is_empty() {
            return Err(SkipReason::EmptyMessages);
        }

        let mut out = Vec::with_capacity(messages.len());
        for (i, msg) in messages.iter().enumerate() {
            let (Some(role), Some(content)) = (msg.get("role"), msg.get("content")) else {
                return Err(SkipReason::MalformedMessage { message: i });
            };
            out.push(Message {
                role: string_field(role, i, "role")?,
                content: string_field(content, i, "content")?,
            });
        }
        Ok(ChatRecord { messages: out })
    }
}

fn string_field(value: &Value, message: usize, field: &'static str) -> Result<String, SkipReason> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(SkipReason::NonStringField { message, field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        RawRecord { line: 1, value }
    }

    #[test]
    fn test_project_keeps_message_order_and_drops_extras() {
        let r = raw(json!({
            "id": 7,
            "messages": [
                {"role": "system", "content": "be brief", "name": "x"},
                {"role": "user", "content": "hi"}
            ]
        }));
        let rec = r.project().unwrap();
        assert_eq!(rec.messages.len(), 2);
        assert_eq!(rec.messages[0].role, "system");
        assert_eq!(rec.messages[1].content, "hi");
        assert!(rec.has_system_message());
    }

    #[test]
    fn test_project_rejects_missing_content() {
        let r = raw(json!({"messages": [{"role": "user"}]}));
        assert_eq!(r.project(), Err(SkipReason::MalformedMessage { message: 0 }));
    }

    #[test]
    fn test_project_rejects_non_string_role() {
        let r = raw(json!({"messages": [
            {"role": "user", "content": "ok"},
            {"role": 3, "content": "bad"}
        ]}));
        assert_eq!(r.project(), Err(SkipReason::NonStringField { message: 1, field: "role" }));
    }

    #[test]
    fn test_project_null_content_is_not_a_missing_key() {
        let r = raw(json!({"messages": [{"role": "user", "content": null}]}));
        assert_eq!(r.project(), Err(SkipReason::NonStringField { message: 0, field: "content" }));
    }

    #[test]
    fn test_project_rejects_empty_and_non_array() {
        assert_eq!(raw(json!({"messages": []})).project(), Err(SkipReason::EmptyMessages));
        assert_eq!(raw(json!({"messages": "hi"})).project(), Err(SkipReason::NotAnArray));
    }

    #[test]
    fn test_system_role_is_exact_match() {
        let rec = ChatRecord {
            messages: vec![Message { role: "System".into(), content: "x".into() }],
        };
        assert!(!rec.has_system_message());
    }
}
