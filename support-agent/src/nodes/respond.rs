//! Reply formatter: a second model call coerces the final answer into `{content, language}`.

use agent_core::{AgentError, Conversation, Language, Message, Result, Role, StructuredReply};
use llm_client::ResponseSchema;
use serde_json::json;
use tracing::debug;

use crate::context::AgentContext;

pub const FORMATTER_INSTRUCTION: &str =
    "Your task is to take next message and converted into a structured message";

pub const RESPONSE_SCHEMA_NAME: &str = "WhatsappResponse";

/// Strict schema for the formatter call.
pub fn response_schema() -> ResponseSchema {
    ResponseSchema {
        name: RESPONSE_SCHEMA_NAME.to_string(),
        description: Some("Response to the user with this".to_string()),
        schema: json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The content of the whatsapp message"
                },
                "language": {
                    "type": "string",
                    "enum": Language::ALL.iter().map(|l| l.code()).collect::<Vec<_>>(),
                    "description": "The language of the whatsapp message. en is for English, ru is for Russian, and ky is for Kyrgyz"
                }
            },
            "required": ["content", "language"],
            "additionalProperties": false
        }),
    }
}

/// Formats the latest assistant message of `conversation`.
pub async fn format_reply(ctx: &AgentContext, conversation: &Conversation) -> Result<StructuredReply> {
    let answer = conversation
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant)
        .ok_or_else(|| AgentError::Formatter("no assistant message to format".to_string()))?;

    let request = [
        Message::system(FORMATTER_INSTRUCTION),
        Message::assistant(answer.content.clone()),
    ];
    let value = ctx
        .llm
        .complete_structured(&request, &response_schema())
        .await
        .map_err(AgentError::Llm)?;
    let reply = parse_reply(&value, &answer.content)?;
    debug!(language = %reply.language, "formatted reply");
    Ok(reply)
}

/// Builds a [`StructuredReply`] from the formatter's JSON.
///
/// A missing `content` falls back to `fallback_content`; the language goes through
/// [`Language::resolve`], so it is always one of en/ru/ky.
pub fn parse_reply(value: &serde_json::Value, fallback_content: &str) -> Result<StructuredReply> {
    let object = value
        .as_object()
        .ok_or_else(|| AgentError::Formatter(format!("expected a JSON object, got {}", value)))?;
    let content = object
        .get("content")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(fallback_content);
    let label = object.get("language").and_then(|v| v.as_str());
    let language = Language::resolve(label, content);
    Ok(StructuredReply::new(content, language))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_supported_languages() {
        let schema = response_schema();
        assert_eq!(schema.name, "WhatsappResponse");
        assert_eq!(
            schema.schema["properties"]["language"]["enum"],
            json!(["en", "ru", "ky"])
        );
        assert_eq!(schema.schema["additionalProperties"], json!(false));
    }

    #[test]
    fn schema_descriptions_guide_the_formatter() {
        let schema = response_schema();
        assert_eq!(schema.description.as_deref(), Some("Response to the user with this"));
        let properties = &schema.schema["properties"];
        assert_eq!(
            properties["content"]["description"],
            "The content of the whatsapp message"
        );
        let language = properties["language"]["description"].as_str().unwrap();
        assert!(language.contains("en is for English, ru is for Russian, and ky is for Kyrgyz"));
    }

    #[test]
    fn parse_reply_uses_model_fields() {
        let reply = parse_reply(&json!({"content": "Привет!", "language": "ru"}), "x").unwrap();
        assert_eq!(reply, StructuredReply::new("Привет!", Language::Ru));
    }

    #[test]
    fn unknown_language_is_detected_from_content() {
        let value = json!({"content": "Саламатсызбы, кандай жардам керек? Сүйлөшөлү", "language": "xx"});
        let reply = parse_reply(&value, "").unwrap();
        assert_eq!(reply.language, Language::Ky);
        let reply = parse_reply(&json!({"content": "Hello there"}), "").unwrap();
        assert_eq!(reply.language, Language::En);
    }

    #[test]
    fn related_language_maps_to_closest() {
        let reply = parse_reply(&json!({"content": "Сәлеметсіз бе", "language": "kk"}), "").unwrap();
        assert_eq!(reply.language, Language::Ky);
    }

    #[test]
    fn missing_content_falls_back_to_answer() {
        let reply = parse_reply(&json!({"language": "en"}), "model answer").unwrap();
        assert_eq!(reply.content, "model answer");
    }

    #[test]
    fn non_object_is_a_formatter_error() {
        assert!(matches!(parse_reply(&json!("text"), ""), Err(AgentError::Formatter(_))));
    }
}
