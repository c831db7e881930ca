//! Generation invoker.
//!
//! Selects the per-mode generation profile, builds the fixed-order message
//! sequence (instruction, optional context, user query), and executes one
//! OpenAI-style chat-completions call. Provider failures are hard failures
//! for the request; there is no local retry.

use serde_json::{json, Value};
use std::time::Duration;

use crate::search::WebContext;
use crate::types::{Message, Mode};
use crate::{Error, Result};

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Low fixed temperature: advisory content favors reproducible answers over
/// creative variation.
const TEMPERATURE: f64 = 0.2;

const STANDARD_INSTRUCTION: &str = "Eres un asesor fiscal especializado en la normativa tributaria \
     española. Responde de forma clara y concisa. Si la respuesta depende de \
     plazos o normativa que cambia cada ejercicio, indícalo expresamente.";

const PRO_INSTRUCTION: &str = "Eres un asesor fiscal senior especializado en la normativa tributaria \
     española. Responde con detalle: cita los modelos y artículos aplicables, \
     señala excepciones y regímenes forales cuando existan, y distingue entre \
     criterio consolidado y cuestiones interpretativas.";

/// Immutable per-mode configuration: model, instruction, cache lifetime.
#[derive(Debug, Clone)]
pub struct GenerationProfile {
    pub model: String,
    pub instruction: &'static str,
    pub cache_ttl: Duration,
}

/// Static lookup table keyed by [`Mode`]. Adding a mode is a data change
/// here, not a new control-flow branch in the pipeline.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    standard: GenerationProfile,
    pro: GenerationProfile,
}

impl ProfileTable {
    pub fn new(standard: GenerationProfile, pro: GenerationProfile) -> Self {
        Self { standard, pro }
    }

    pub fn get(&self, mode: Mode) -> &GenerationProfile {
        match mode {
            Mode::Standard => &self.standard,
            Mode::Pro => &self.pro,
        }
    }

    pub fn standard_mut(&mut self) -> &mut GenerationProfile {
        &mut self.standard
    }

    pub fn pro_mut(&mut self) -> &mut GenerationProfile {
        &mut self.pro
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            standard: GenerationProfile {
                model: "gpt-4o-mini".into(),
                instruction: STANDARD_INSTRUCTION,
                cache_ttl: Duration::from_secs(24 * 60 * 60),
            },
            pro: GenerationProfile {
                model: "gpt-4o".into(),
                instruction: PRO_INSTRUCTION,
                cache_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            },
        }
    }
}

/// A fresh generation: answer text plus the provider's token accounting,
/// reported verbatim.
#[derive(Debug, Clone)]
pub struct Generation {
    pub answer: String,
    pub tokens_used: u64,
}

pub struct GenerationInvoker {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    profiles: ProfileTable,
}

impl GenerationInvoker {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        profiles: ProfileTable,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            profiles,
        })
    }

    pub fn profile(&self, mode: Mode) -> &GenerationProfile {
        self.profiles.get(mode)
    }

    /// Invokes the provider for one query. `context`, when present and
    /// non-empty, is attached between the instruction and the user query.
    pub async fn generate(
        &self,
        query: &str,
        mode: Mode,
        context: Option<&WebContext>,
    ) -> Result<Generation> {
        let profile = self.profiles.get(mode);
        let messages = build_messages(profile, query, context);

        let body = json!({
            "model": profile.model,
            "messages": messages,
            "temperature": TEMPERATURE,
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Provider(format!("provider returned {status}")));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        let answer = body
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::Provider("response missing message content".into()))?
            .to_string();
        let tokens_used = body
            .pointer("/usage/total_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);

        Ok(Generation { answer, tokens_used })
    }
}

/// Fixed message order: instruction, optional context, exactly one user
/// query. The provider treats the instruction as highest authority and the
/// context as secondary grounding.
fn build_messages(
    profile: &GenerationProfile,
    query: &str,
    context: Option<&WebContext>,
) -> Vec<Message> {
    let mut messages = vec![Message::system(profile.instruction)];
    if let Some(ctx) = context.filter(|c| !c.is_empty()) {
        messages.push(Message::system(format!(
            "Contexto reciente de búsqueda web:\n{}",
            ctx.as_context_block()
        )));
    }
    messages.push(Message::user(query));
    messages
}
