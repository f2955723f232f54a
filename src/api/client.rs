// src/api/client.rs

use super::{config, errors::ApiError};
use crate::file_processing::response_parser::extract_code;
use crate::models::ai::{ChatMessage, CodeGenerationRequest, CodeGenerationResponse, Role};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// LLM provider the client talks to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[value(name = "openai")]
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => config::DEFAULT_OPENAI_MODEL,
            Provider::Anthropic => config::DEFAULT_ANTHROPIC_MODEL,
        }
    }
}

/// Per-request knobs, usually taken from `config.toml`.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub retries: u32,
    /// Extra instructions appended to every system prompt.
    pub system_prompt: String,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.3,
            max_tokens: 8000,
            retries: 3,
            system_prompt: String::new(),
        }
    }
}

/// API client for code generation, fixing and chat.
pub struct AiClient {
    client: Client,
    provider: Provider,
    api_key: String,
    options: RequestOptions,
    history: Vec<ChatMessage>,
}

impl AiClient {
    /// Creates a new `AiClient`.
    pub fn new(provider: Provider, api_key: String, options: RequestOptions) -> Self {
        Self {
            client: Client::new(),
            provider,
            api_key,
            options,
            history: Vec::new(),
        }
    }

    pub fn model(&self) -> &str {
        self.options
            .model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Replaces the conversation with messages loaded elsewhere.
    pub fn sync_history(&mut self, messages: Vec<ChatMessage>) {
        self.history = messages;
    }

    /// Appends one exchange, keeping only the most recent messages.
    fn remember(&mut self, user: &str, assistant: &str) {
        self.history.push(ChatMessage::new(Role::User, user));
        self.history.push(ChatMessage::new(Role::Assistant, assistant));
        let excess = self
            .history
            .len()
            .saturating_sub(config::MAX_HISTORY_MESSAGES);
        self.history.drain(..excess);
    }

    /// Generates code for a prompt, optionally against the current project.
    /// The prompt and the generated code join the history on success.
    pub async fn generate_code(
        &mut self,
        request: &CodeGenerationRequest,
    ) -> Result<CodeGenerationResponse, ApiError> {
        log::debug!("Calling {:?} for code generation", self.provider);

        let system_prompt = self.with_user_instructions(generation_system_prompt(
            &request.constraints,
        ));
        let user_prompt = build_generation_prompt(request, &self.history);
        let messages = vec![ChatMessage::new(Role::User, user_prompt)];

        let reply = self
            .send_with_retries(&system_prompt, &messages, self.options.max_tokens)
            .await?;
        let code = extract_code(&reply);
        self.remember(&request.prompt, &code);
        Ok(CodeGenerationResponse {
            code,
            explanation: Some("Code generated and ready!".to_string()),
        })
    }

    /// Asks the model to repair `code`, usually the whole project rendered
    /// with `// File:` markers, given the preview error.
    pub async fn fix_code(
        &self,
        code: &str,
        error: Option<&str>,
    ) -> Result<CodeGenerationResponse, ApiError> {
        log::debug!("Calling {:?} to fix code", self.provider);

        let system_prompt = self.with_user_instructions(config::FIX_SYSTEM_PROMPT.to_string());
        let messages = vec![ChatMessage::new(Role::User, build_fix_prompt(code, error))];

        let reply = self
            .send_with_retries(&system_prompt, &messages, self.options.max_tokens)
            .await?;
        Ok(CodeGenerationResponse {
            code: extract_code(&reply),
            explanation: Some(match error {
                Some(error) => format!("Fixed error: {}", error),
                None => "Fixed code issues".to_string(),
            }),
        })
    }

    /// One chat turn. The exchange is appended to the history on success.
    pub async fn chat(
        &mut self,
        message: &str,
        code_context: Option<&str>,
    ) -> Result<String, ApiError> {
        let content = match code_context {
            Some(code) => format!("Current code:\n```\n{}\n```\n\n{}", code, message),
            None => message.to_string(),
        };
        let mut messages = self.history.clone();
        messages.push(ChatMessage::new(Role::User, content));

        let system_prompt = self.with_user_instructions(config::CHAT_SYSTEM_PROMPT.to_string());
        let reply = self
            .send_with_retries(&system_prompt, &messages, config::CHAT_MAX_TOKENS)
            .await?;

        self.remember(message, &reply);
        Ok(reply)
    }

    fn with_user_instructions(&self, system_prompt: String) -> String {
        let extra = self.options.system_prompt.trim();
        if extra.is_empty() {
            system_prompt
        } else {
            format!("{}\n\nADDITIONAL INSTRUCTIONS:\n{}", system_prompt, extra)
        }
    }

    async fn send_with_retries(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, ApiError> {
        let mut retries = self.options.retries;
        loop {
            match self.send_request(system_prompt, messages, max_tokens).await {
                Ok(response) => return Ok(response),
                Err(e) if retries > 0 => {
                    retries -= 1;
                    log::warn!("API call failed, retries left: {} ({})", retries, e);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_request(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, ApiError> {
        match self.provider {
            Provider::OpenAi => {
                let model = self.model();
                match self
                    .send_openai(model, system_prompt, messages, max_tokens)
                    .await
                {
                    Err(e) if e.is_model_not_found() && model != config::FALLBACK_OPENAI_MODEL => {
                        log::warn!(
                            "Model {} not available, falling back to {}",
                            model,
                            config::FALLBACK_OPENAI_MODEL
                        );
                        self.send_openai(
                            config::FALLBACK_OPENAI_MODEL,
                            system_prompt,
                            messages,
                            max_tokens,
                        )
                        .await
                    }
                    other => other,
                }
            }
            Provider::Anthropic => {
                self.send_anthropic(system_prompt, messages, max_tokens)
                    .await
            }
        }
    }

    async fn send_openai(
        &self,
        model: &str,
        system_prompt: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, ApiError> {
        let body = openai_request_body(
            model,
            system_prompt,
            messages,
            self.options.temperature,
            max_tokens,
        );
        let response = self
            .client
            .post(config::OPENAI_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let json_response = read_json(response).await?;
        let text = parse_openai_response(&json_response)?;
        log::info!("OpenAI response: {} chars", text.len());
        Ok(text)
    }

    async fn send_anthropic(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, ApiError> {
        let body = anthropic_request_body(
            self.model(),
            system_prompt,
            messages,
            self.options.temperature,
            max_tokens,
        );
        let response = self
            .client
            .post(config::ANTHROPIC_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", config::ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let json_response = read_json(response).await?;
        let text = parse_anthropic_response(&json_response)?;
        log::info!("Anthropic response: {} chars", text.len());
        Ok(text)
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let raw_response = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::ApiError {
            status: status.as_u16(),
            message: error_message(&raw_response),
        });
    }
    Ok(serde_json::from_str(&raw_response)?)
}

/// Best-effort extraction of the provider's error message from a body.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            let error = value.get("error")?;
            error
                .get("message")
                .or_else(|| error.get("code"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| Some(error.to_string()))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

pub fn openai_request_body(
    model: &str,
    system_prompt: &str,
    messages: &[ChatMessage],
    temperature: f32,
    max_tokens: u32,
) -> Value {
    let mut all = vec![json!({"role": "system", "content": system_prompt})];
    all.extend(
        messages
            .iter()
            .map(|m| json!({"role": m.role.as_str(), "content": m.content})),
    );
    json!({
        "model": model,
        "messages": all,
        "temperature": temperature,
        "max_tokens": max_tokens,
    })
}

/// Anthropic takes the system prompt separately and rejects `system` roles
/// inside `messages`.
pub fn anthropic_request_body(
    model: &str,
    system_prompt: &str,
    messages: &[ChatMessage],
    temperature: f32,
    max_tokens: u32,
) -> Value {
    let messages: Vec<Value> = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
        .collect();
    json!({
        "model": model,
        "max_tokens": max_tokens,
        "system": system_prompt,
        "messages": messages,
        "temperature": temperature,
    })
}

pub fn parse_openai_response(value: &Value) -> Result<String, ApiError> {
    if let Some(error) = value.get("error") {
        return Err(ApiError::ApiError {
            status: 200,
            message: error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string()),
        });
    }
    value["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or(ApiError::EmptyResponse)
}

pub fn parse_anthropic_response(value: &Value) -> Result<String, ApiError> {
    value["content"][0]["text"]
        .as_str()
        .map(str::to_string)
        .ok_or(ApiError::EmptyResponse)
}

pub fn generation_system_prompt(constraints: &[String]) -> String {
    let constraints = if constraints.is_empty() {
        config::NO_CONSTRAINTS_TEXT.to_string()
    } else {
        format!("Constraints: {}", constraints.join(", "))
    };
    config::GENERATE_SYSTEM_PROMPT.replace("{constraints}", &constraints)
}

pub fn build_generation_prompt(request: &CodeGenerationRequest, history: &[ChatMessage]) -> String {
    let mut conversation = String::new();
    if !history.is_empty() {
        conversation.push_str("\n\nPREVIOUS CONVERSATION:\n");
        let excerpts: Vec<String> = history
            .iter()
            .map(|msg| {
                let excerpt: String = msg
                    .content
                    .chars()
                    .take(config::HISTORY_EXCERPT_CHARS)
                    .collect();
                format!("{}: {}...", msg.role.as_str().to_uppercase(), excerpt)
            })
            .collect();
        conversation.push_str(&excerpts.join("\n"));
    }

    match &request.context {
        Some(context) => format!(
            "CURRENT PROJECT:\n{}\n{}\n\nUSER REQUEST: {}\n\nGenerate code that fulfills this request. If user is asking to modify existing code, return updated version of all affected files.",
            context, conversation, request.prompt
        ),
        None => format!(
            "{}\n\nUSER REQUEST: {}\n\nGenerate complete code.",
            conversation, request.prompt
        ),
    }
}

pub fn build_fix_prompt(code: &str, error: Option<&str>) -> String {
    match error {
        Some(error) => format!(
            "ERROR TO FIX:\n{}\n\nCODE WITH ERRORS:\n{}\n\nAnalyze the error carefully. Fix ALL issues in the code. Return complete, working code that compiles and runs without errors. If multiple files are provided, fix all affected files.",
            error, code
        ),
        None => format!(
            "Review and fix all issues in this code:\n{}\n\nReturn complete, working code that compiles and runs without errors.",
            code
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_body_prepends_system() {
        let body = openai_request_body(
            "gpt-4o",
            "sys",
            &[ChatMessage::new(Role::User, "hi")],
            0.3,
            8000,
        );
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["max_tokens"], 8000);
    }

    #[test]
    fn test_anthropic_body_keeps_system_separate() {
        let body = anthropic_request_body(
            "claude",
            "sys",
            &[
                ChatMessage::new(Role::System, "ignored"),
                ChatMessage::new(Role::User, "hi"),
                ChatMessage::new(Role::Assistant, "hello"),
            ],
            0.3,
            4000,
        );
        assert_eq!(body["system"], "sys");
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][1]["role"], "assistant");
    }

    #[test]
    fn test_parse_responses() {
        let openai = json!({"choices": [{"message": {"content": "code"}}]});
        assert_eq!(parse_openai_response(&openai).unwrap(), "code");

        let anthropic = json!({"content": [{"type": "text", "text": "reply"}]});
        assert_eq!(parse_anthropic_response(&anthropic).unwrap(), "reply");

        assert!(matches!(
            parse_openai_response(&json!({"choices": []})),
            Err(ApiError::EmptyResponse)
        ));
        let error = parse_openai_response(&json!({"error": {"message": "quota"}})).unwrap_err();
        assert!(error.to_string().contains("quota"));
    }

    #[test]
    fn test_error_message_and_model_fallback_detection() {
        assert_eq!(
            error_message(r#"{"error": {"message": "The model `gpt-9` does not exist", "code": "model_not_found"}}"#),
            "The model `gpt-9` does not exist"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");

        let not_found = ApiError::ApiError {
            status: 404,
            message: "nope".into(),
        };
        assert!(not_found.is_model_not_found());
        let rate_limited = ApiError::ApiError {
            status: 429,
            message: "Rate limit reached".into(),
        };
        assert!(!rate_limited.is_model_not_found());
    }

    #[test]
    fn test_generation_prompt_with_context_and_history() {
        let request = CodeGenerationRequest {
            prompt: "make it blue".into(),
            context: Some("// File: /src/App.tsx\nx".into()),
            constraints: vec![],
        };
        let long = "y".repeat(500);
        let history = vec![ChatMessage::new(Role::Assistant, long)];
        let prompt = build_generation_prompt(&request, &history);

        assert!(prompt.starts_with("CURRENT PROJECT:\n// File: /src/App.tsx\nx\n"));
        assert!(prompt.contains("PREVIOUS CONVERSATION:\nASSISTANT: "));
        assert!(prompt.contains(&format!("{}...", "y".repeat(300))));
        assert!(!prompt.contains(&"y".repeat(301)));
        assert!(prompt.contains("USER REQUEST: make it blue"));
    }

    #[test]
    fn test_system_prompt_constraints() {
        assert!(generation_system_prompt(&[]).contains(config::NO_CONSTRAINTS_TEXT));
        let prompt = generation_system_prompt(&["no classes".into(), "under 50 lines".into()]);
        assert!(prompt.contains("10. Constraints: no classes, under 50 lines"));
    }

    #[test]
    fn test_fix_prompt() {
        let prompt = build_fix_prompt("code", Some("boom"));
        assert!(prompt.starts_with("ERROR TO FIX:\nboom\n\nCODE WITH ERRORS:\ncode"));
        assert!(build_fix_prompt("code", None).starts_with("Review and fix"));
    }

    #[test]
    fn test_history_keeps_recent_exchanges() {
        let mut client = AiClient::new(Provider::OpenAi, "k".into(), RequestOptions::default());
        client.sync_history(vec![ChatMessage::new(Role::User, "earlier")]);
        client.remember("make a counter", "export default function App() {}");
        assert_eq!(client.history().len(), 3);
        assert_eq!(client.history()[2].role, Role::Assistant);

        for i in 0..config::MAX_HISTORY_MESSAGES {
            client.remember(&format!("q{}", i), "a");
        }
        assert_eq!(client.history().len(), config::MAX_HISTORY_MESSAGES);
        assert_eq!(
            client.history().last().unwrap().content,
            "a"
        );
        assert!(client.history().iter().all(|m| m.content != "earlier"));
    }

    #[test]
    fn test_model_defaults() {
        let client = AiClient::new(Provider::Anthropic, "k".into(), RequestOptions::default());
        assert_eq!(client.model(), config::DEFAULT_ANTHROPIC_MODEL);

        let options = RequestOptions {
            model: Some("gpt-4.1".into()),
            ..RequestOptions::default()
        };
        let client = AiClient::new(Provider::OpenAi, "k".into(), options);
        assert_eq!(client.model(), "gpt-4.1");
        assert!(client.history().is_empty());
    }
}
