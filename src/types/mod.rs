//! Core type definitions: request mode, chat messages, and the HTTP wire
//! shapes for the ask endpoint.

pub mod message;

use serde::{Deserialize, Serialize};

pub use message::{Message, MessageRole};

/// Request mode. Selects the generation profile (model, instruction, cache
/// lifetime) applied to a query. Closed enumeration: adding a mode means
/// adding a profile, not a new code path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Standard,
    Pro,
}

impl Mode {
    /// Stable tag used in cache-key derivation and logging.
    pub fn tag(&self) -> &'static str {
        match self {
            Mode::Standard => "standard",
            Mode::Pro => "pro",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Inbound body for `POST /ask`.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub query: String,
    #[serde(default)]
    pub mode: Mode,
}

/// Response body for `POST /ask`. `tokens_used` is present only when the
/// answer came from a fresh generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub mode: Mode,
    pub cached: bool,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_defaults_to_standard() {
        let req: AskRequest = serde_json::from_str(r#"{"query": "¿Qué es el IVA?"}"#).unwrap();
        assert_eq!(req.mode, Mode::Standard);
    }

    #[test]
    fn test_mode_parses_lowercase_tags() {
        let req: AskRequest =
            serde_json::from_str(r#"{"query": "q", "mode": "pro"}"#).unwrap();
        assert_eq!(req.mode, Mode::Pro);
    }

    #[test]
    fn test_tokens_used_omitted_on_cached_response() {
        let resp = AskResponse {
            mode: Mode::Standard,
            cached: true,
            answer: "ok".into(),
            tokens_used: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("tokens_used").is_none());
        assert_eq!(json["mode"], "standard");
    }
}
