use serde::{Deserialize, Serialize};

use super::params::{GenerationConfig, SafetySettings};
use super::provider::{AssistantInput, AssistantOutput, LlmError, LlmProvider, LlmResult, Turn};
use crate::http::client::HttpClient;

const MAX_ERROR_BODY_CHARS: usize = 400;
const BLOCKING_FINISH_REASONS: [&str; 5] = [
    "SAFETY",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
    "RECITATION",
];

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(
        client: HttpClient,
        api_key: Option<String>,
        model: String,
        base_url: String,
    ) -> LlmResult<Self> {
        let api_key = api_key
            .filter(|v| !v.trim().is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        Ok(Self {
            client: client.with_label(format!("gemini/{model}")),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(input: &AssistantInput) -> GeminiGenerateRequest<'_> {
        GeminiGenerateRequest {
            contents: input.turns.iter().map(GeminiContent::from_turn).collect(),
            system_instruction: input
                .system_instruction
                .as_deref()
                .map(|text| GeminiSystemInstruction {
                    parts: vec![GeminiPart { text }],
                }),
            generation_config: &input.generation,
            safety_settings: &input.safety,
        }
    }

    fn extract_text(resp: GeminiGenerateResponse) -> LlmResult<String> {
        if let Some(reason) = resp.prompt_feedback.and_then(|fb| fb.block_reason) {
            return Err(LlmError::Blocked(reason));
        }

        let Some(candidate) = resp.candidates.into_iter().next() else {
            return Err(LlmError::EmptyResponse);
        };

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }

        match candidate.finish_reason {
            Some(reason) if BLOCKING_FINISH_REASONS.contains(&reason.as_str()) => {
                Err(LlmError::Blocked(reason))
            }
            _ => Err(LlmError::EmptyResponse),
        }
    }
}

impl LlmProvider for GeminiProvider {
    async fn generate(&self, input: AssistantInput) -> LlmResult<AssistantOutput> {
        let payload = Self::build_request(&input);
        let resp = self
            .client
            .post_json(
                &self.endpoint(),
                &[("key", self.api_key.as_str())],
                &payload,
            )
            .await
            .map_err(|err| LlmError::Transport(err.to_string()))?;

        if !(200..300).contains(&resp.status) {
            let body = resp.body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(LlmError::HttpStatus {
                status: resp.status,
                body,
            });
        }

        let parsed = serde_json::from_str::<GeminiGenerateResponse>(&resp.body)
            .map_err(|err| LlmError::Parse(err.to_string()))?;
        let text = Self::extract_text(parsed)?;
        Ok(AssistantOutput { text })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction<'a>>,
    generation_config: &'a GenerationConfig,
    safety_settings: &'a SafetySettings,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

impl<'a> GeminiContent<'a> {
    fn from_turn(turn: &'a Turn) -> Self {
        Self {
            role: turn.role.as_str(),
            parts: vec![GeminiPart { text: &turn.text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}
