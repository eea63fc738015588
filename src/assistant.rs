//! Voice/chat assistant over an OpenAI-compatible API
//!
//! The model answers questions about the collection by calling a single
//! tool, `buscar_en_catalogo`, which is served by the catalog search
//! endpoint. Audio questions are transcribed first; answers can be
//! synthesized to an audio file.

use crate::catalog::{CatalogItem, SearchResponse};
use crate::client::{CatalogClient, CatalogError};
use crate::config::AssistantConfig;
use crate::state::{SharedState, write_state};
use crate::types::{ChatTurn, LoadingState, Speaker};
use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Value, json};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SEARCH_TOOL: &str = "buscar_en_catalogo";

const SYSTEM_PROMPT: &str = "Eres un asistente que responde preguntas sobre la colección \
de LEGO del usuario. Usa la herramienta buscar_en_catalogo siempre que necesites datos \
del catálogo y no inventes sets. Responde en español, de forma breve.";

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Raw JSON arguments, echoed back in the follow-up request
    pub arguments: String,
    /// The `pregunta` argument, when it parsed
    pub question: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantReply {
    pub answer: String,
    /// Records returned by every catalog search made while answering
    pub items: Vec<CatalogItem>,
    pub searches: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    config: AssistantConfig,
    api_key: Option<String>,
}

impl AssistantClient {
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            config: config.clone(),
            api_key: config.resolve_api_key(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow!("OPENAI_API_KEY not set"))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// Speech-to-text for a local audio file
    pub async fn transcribe(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read audio file {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());

        let form = reqwest::multipart::Form::new()
            .text("model", self.config.transcription_model.clone())
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            );

        let response = self
            .http
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(self.key()?)
            .multipart(form)
            .send()
            .await?;
        let json = check_json(response).await?;

        json.get("text")
            .and_then(Value::as_str)
            .map(|t| t.trim().to_string())
            .ok_or_else(|| anyhow!("Invalid transcription response: missing text"))
    }

    /// Answer a question, letting the model search the catalog once per tool call
    pub async fn ask(
        &self,
        question: &str,
        history: &[ChatTurn],
        catalog: &CatalogClient,
    ) -> Result<AssistantReply> {
        run_tool_rounds(
            &self.config.chat_model,
            conversation_messages(history, question),
            move |body| self.chat(body),
            move |q: String| async move { catalog.search(&q).await },
        )
        .await
    }

    async fn chat(&self, body: Value) -> Result<Value> {
        let response = self
            .http
            .post(self.endpoint("chat/completions"))
            .bearer_auth(self.key()?)
            .json(&body)
            .send()
            .await?;
        let json = check_json(response).await?;

        json.pointer("/choices/0/message")
            .cloned()
            .ok_or_else(|| anyhow!("Invalid chat response: missing choices[0].message"))
    }

    /// Text-to-speech, written to `path`
    pub async fn speak(&self, text: &str, path: &Path) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint("audio/speech"))
            .bearer_auth(self.key()?)
            .json(&json!({
                "model": self.config.speech_model,
                "voice": self.config.voice,
                "input": text,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("OpenAI API error {}: {}", status, body);
        }
        let audio = response.bytes().await?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &audio)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Two rounds of chat: the first may call the search tool, the second
/// (without tools) answers from the tool results.
async fn run_tool_rounds<C, CF, S, SF>(
    model: &str,
    mut messages: Vec<Value>,
    mut chat: C,
    search: S,
) -> Result<AssistantReply>
where
    C: FnMut(Value) -> CF,
    CF: Future<Output = Result<Value>>,
    S: Fn(String) -> SF,
    SF: Future<Output = Result<SearchResponse, CatalogError>>,
{
    let first = chat(chat_body(model, &messages, true)).await?;

    let calls = extract_tool_calls(&first);
    if calls.is_empty() {
        if has_tool_calls(&first) {
            bail!("Invalid chat response: unreadable tool calls");
        }
        return Ok(AssistantReply {
            answer: message_content(&first),
            ..Default::default()
        });
    }

    let mut reply = AssistantReply::default();
    messages.push(assistant_turn(&first, &calls));

    for call in &calls {
        let content = match (&call.name[..], &call.question) {
            (SEARCH_TOOL, Some(q)) => {
                tracing::info!(question = %q, "assistant catalog search");
                reply.searches.push(q.clone());
                match search(q.clone()).await {
                    Ok(response) => {
                        let content = tool_result(&response);
                        reply.items.extend(response.items);
                        content
                    }
                    Err(e) => format!("Error: {e}"),
                }
            }
            (SEARCH_TOOL, None) => "Error: falta el argumento 'pregunta'".to_string(),
            (other, _) => format!("Error: herramienta desconocida '{other}'"),
        };
        messages.push(json!({
            "role": "tool",
            "tool_call_id": call.id,
            "content": content,
        }));
    }

    let second = chat(chat_body(model, &messages, false)).await?;
    reply.answer = message_content(&second);
    Ok(reply)
}

/// Request body for `chat/completions`
pub fn chat_body(model: &str, messages: &[Value], with_tools: bool) -> Value {
    let mut body = json!({
        "model": model,
        "messages": messages,
    });
    if with_tools {
        body["tools"] = tool_definitions();
        body["tool_choice"] = json!("auto");
    }
    body
}

fn has_tool_calls(message: &Value) -> bool {
    message
        .get("tool_calls")
        .and_then(Value::as_array)
        .is_some_and(|calls| !calls.is_empty())
}

/// The model's tool-calling turn, limited to the calls that will be answered
pub fn assistant_turn(message: &Value, calls: &[ToolCall]) -> Value {
    let tool_calls: Vec<Value> = calls
        .iter()
        .map(|call| {
            json!({
                "id": call.id,
                "type": "function",
                "function": {"name": call.name, "arguments": call.arguments},
            })
        })
        .collect();
    json!({
        "role": "assistant",
        "content": message.get("content").cloned().unwrap_or(Value::Null),
        "tool_calls": tool_calls,
    })
}

async fn check_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("OpenAI API error {}: {}", status, body);
    }
    Ok(response.json().await?)
}

/// The single function the model may call
pub fn tool_definitions() -> Value {
    json!([{
        "type": "function",
        "function": {
            "name": SEARCH_TOOL,
            "description": "Busca sets en el catálogo LEGO del usuario a partir de una pregunta en lenguaje natural.",
            "parameters": {
                "type": "object",
                "properties": {
                    "pregunta": {
                        "type": "string",
                        "description": "La pregunta a enviar al buscador del catálogo"
                    }
                },
                "required": ["pregunta"]
            }
        }
    }])
}

/// System prompt, prior turns, then the new question
pub fn conversation_messages(history: &[ChatTurn], question: &str) -> Vec<Value> {
    let mut messages = vec![json!({"role": "system", "content": SYSTEM_PROMPT})];
    for turn in history {
        let role = match turn.speaker {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
            Speaker::System => continue,
        };
        messages.push(json!({"role": role, "content": turn.text}));
    }
    messages.push(json!({"role": "user", "content": question}));
    messages
}

/// Tool calls in an assistant message; arguments arrive as a JSON string
pub fn extract_tool_calls(message: &Value) -> Vec<ToolCall> {
    let Some(calls) = message.get("tool_calls").and_then(Value::as_array) else {
        return Vec::new();
    };

    calls
        .iter()
        .filter_map(|call| {
            let id = call.get("id")?.as_str()?.to_string();
            let function = call.get("function")?;
            let name = function.get("name")?.as_str()?.to_string();
            let arguments = function
                .get("arguments")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let question = serde_json::from_str::<Value>(&arguments)
                .ok()
                .and_then(|args| args.get("pregunta")?.as_str().map(str::to_string))
                .filter(|q| !q.trim().is_empty());
            Some(ToolCall {
                id,
                name,
                arguments,
                question,
            })
        })
        .collect()
}

pub fn message_content(message: &Value) -> String {
    message
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// What the model sees from a catalog search
pub fn tool_result(response: &SearchResponse) -> String {
    json!({
        "respuesta": response.answer,
        "resultados": response.items,
    })
    .to_string()
}

/// `@path/to/file.wav` asks with a recording instead of typed text
pub fn audio_path(input: &str) -> Option<PathBuf> {
    let path = input.trim().strip_prefix('@')?.trim();
    (!path.is_empty()).then(|| PathBuf::from(path))
}

/// Transcribe (if needed) and answer in the background
pub fn ask_background(
    state: SharedState,
    assistant: AssistantClient,
    catalog: CatalogClient,
    input: String,
) {
    let history = {
        let mut s = write_state(&state);
        s.assistant.loading = LoadingState::Loading;
        s.assistant.turns.clone()
    };

    tokio::spawn(async move {
        let question = match audio_path(&input) {
            Some(path) => match assistant.transcribe(&path).await {
                Ok(text) => {
                    write_state(&state)
                        .assistant
                        .turns
                        .push(ChatTurn::new(Speaker::System, format!("🎙️ {}", path.display())));
                    text
                }
                Err(e) => {
                    tracing::warn!(error = %e, "transcription failed");
                    write_state(&state).assistant.loading = LoadingState::Error(format!("{e:#}"));
                    return;
                }
            },
            None => input.trim().to_string(),
        };

        write_state(&state)
            .assistant
            .turns
            .push(ChatTurn::new(Speaker::User, question.clone()));

        let result = assistant.ask(&question, &history, &catalog).await;

        let mut s = write_state(&state);
        match result {
            Ok(reply) => {
                tracing::info!(searches = reply.searches.len(), items = reply.items.len(), "assistant answered");
                for search in &reply.searches {
                    s.assistant
                        .turns
                        .push(ChatTurn::new(Speaker::System, format!("🔎 {search}")));
                }
                s.cache.remember_all(&reply.items);
                s.assistant.turns.push(ChatTurn::new(Speaker::Assistant, reply.answer));
                if !reply.searches.is_empty() {
                    s.assistant.items = reply.items;
                    s.assistant.selected = 0;
                }
                s.assistant.loading = LoadingState::Complete;
            }
            Err(e) => {
                tracing::warn!(error = %e, "assistant request failed");
                s.assistant.loading = LoadingState::Error(format!("{e:#}"));
            }
        }
    });
}

/// Synthesize `text` to `path` in the background
pub fn speak_background(state: SharedState, assistant: AssistantClient, text: String, path: PathBuf) {
    write_state(&state).assistant.speech = LoadingState::Loading;

    tokio::spawn(async move {
        let result = assistant.speak(&text, &path).await;
        let mut s = write_state(&state);
        match result {
            Ok(()) => {
                tracing::info!(path = %path.display(), "speech written");
                s.assistant.speech = LoadingState::Complete;
                s.ui.status = Some(format!("Audio guardado en {}", path.display()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis failed");
                s.assistant.speech = LoadingState::Error(format!("{e:#}"));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definitions_shape() {
        let tools = tool_definitions();
        assert_eq!(tools[0]["function"]["name"], SEARCH_TOOL);
        assert_eq!(tools[0]["function"]["parameters"]["required"][0], "pregunta");
    }

    #[test]
    fn test_extract_tool_calls() {
        let message = json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [
                {
                    "id": "call_1",
                    "type": "function",
                    "function": {
                        "name": "buscar_en_catalogo",
                        "arguments": "{\"pregunta\": \"sets de Harry Potter\"}"
                    }
                },
                {
                    "id": "call_2",
                    "type": "function",
                    "function": {"name": "buscar_en_catalogo", "arguments": "not json"}
                }
            ]
        });

        let calls = extract_tool_calls(&message);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].question.as_deref(), Some("sets de Harry Potter"));
        assert_eq!(calls[1].id, "call_2");
        assert_eq!(calls[1].question, None);
        assert_eq!(message_content(&message), "");
    }

    #[test]
    fn test_no_tool_calls() {
        let message = json!({"role": "assistant", "content": " Hola "});
        assert!(extract_tool_calls(&message).is_empty());
        assert_eq!(message_content(&message), "Hola");
    }

    #[test]
    fn test_conversation_messages_skip_system_turns() {
        let history = vec![
            ChatTurn::new(Speaker::User, "¿Cuántos sets tengo?"),
            ChatTurn::new(Speaker::System, "🔎 todos"),
            ChatTurn::new(Speaker::Assistant, "Tienes 12."),
        ];
        let messages = conversation_messages(&history, "¿Y de Star Wars?");
        let roles: Vec<&str> = messages.iter().map(|m| m["role"].as_str().unwrap()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(messages[3]["content"], "¿Y de Star Wars?");
    }

    #[test]
    fn test_tool_result_carries_records() {
        let response = SearchResponse {
            answer: "Uno".to_string(),
            items: vec![CatalogItem {
                set_number: Some(21318),
                ..Default::default()
            }],
        };
        let parsed: Value = serde_json::from_str(&tool_result(&response)).unwrap();
        assert_eq!(parsed["respuesta"], "Uno");
        assert_eq!(parsed["resultados"][0]["set_number"], 21318);
    }

    #[test]
    fn test_audio_path() {
        assert_eq!(audio_path("@ /tmp/q.wav"), Some(PathBuf::from("/tmp/q.wav")));
        assert_eq!(audio_path("@"), None);
        assert_eq!(audio_path("hola"), None);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let config = AssistantConfig {
            api_key: None,
            ..Default::default()
        };
        let mut client = AssistantClient::new(&config).unwrap();
        client.api_key = None;
        let err = client.speak("hola", Path::new("/tmp/x.mp3")).await.unwrap_err();
        assert_eq!(err.to_string(), "OPENAI_API_KEY not set");
    }

    fn search_castles(q: String) -> impl Future<Output = Result<SearchResponse, CatalogError>> {
        async move {
            if q == "castillos" {
                Ok(SearchResponse {
                    answer: "Un castillo".to_string(),
                    items: vec![CatalogItem {
                        set_number: Some(10305),
                        ..Default::default()
                    }],
                })
            } else {
                Err(CatalogError::NotConfigured("Search"))
            }
        }
    }

    fn tool_call(id: &str, name: &str, arguments: &str) -> Value {
        json!({
            "id": id,
            "type": "function",
            "function": {"name": name, "arguments": arguments}
        })
    }

    fn question() -> Vec<Value> {
        conversation_messages(&[], "¿Tengo castillos?")
    }

    #[tokio::test]
    async fn test_answer_without_tool_calls() {
        let mut sent = Vec::new();
        let reply = run_tool_rounds(
            "gpt-test",
            question(),
            |body| {
                sent.push(body);
                async { Ok(json!({"role": "assistant", "content": "Tienes 3 sets"})) }
            },
            search_castles,
        )
        .await
        .unwrap();

        assert_eq!(reply.answer, "Tienes 3 sets");
        assert!(reply.searches.is_empty());
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["tools"][0]["function"]["name"], SEARCH_TOOL);
        assert_eq!(sent[0]["model"], "gpt-test");
    }

    #[tokio::test]
    async fn test_each_tool_call_gets_one_reply() {
        let mut replies = vec![
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [
                    tool_call("call_1", SEARCH_TOOL, r#"{"pregunta": "castillos"}"#),
                    tool_call("call_2", SEARCH_TOOL, r#"{"pregunta": "naves"}"#),
                    tool_call("call_3", SEARCH_TOOL, "{}"),
                    tool_call("call_4", "borrar_todo", "{}"),
                ]
            }),
            json!({"role": "assistant", "content": "Tienes un castillo."}),
        ]
        .into_iter();
        let mut sent = Vec::new();

        let reply = run_tool_rounds(
            "gpt-test",
            question(),
            |body| {
                sent.push(body);
                let next = replies.next();
                async move { next.ok_or_else(|| anyhow!("unexpected request")) }
            },
            search_castles,
        )
        .await
        .unwrap();

        assert_eq!(reply.answer, "Tienes un castillo.");
        assert_eq!(reply.searches, vec!["castillos", "naves"]);
        assert_eq!(reply.items.len(), 1);

        assert_eq!(sent.len(), 2);
        let second = &sent[1];
        assert!(second.get("tools").is_none());
        assert!(second.get("tool_choice").is_none());

        let messages = second["messages"].as_array().unwrap();
        let tool_messages: Vec<&Value> =
            messages.iter().filter(|m| m["role"] == "tool").collect();
        let ids: Vec<&str> = tool_messages
            .iter()
            .map(|m| m["tool_call_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["call_1", "call_2", "call_3", "call_4"]);

        let contents: Vec<&str> = tool_messages
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert!(contents[0].contains("\"resultados\""));
        assert_eq!(
            contents[1],
            "Error: Search URL is not configured (press ',' to set it)"
        );
        assert_eq!(contents[2], "Error: falta el argumento 'pregunta'");
        assert_eq!(contents[3], "Error: herramienta desconocida 'borrar_todo'");
    }

    #[tokio::test]
    async fn test_malformed_tool_call_left_out_of_follow_up() {
        let mut replies = vec![
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [
                    tool_call("call_1", SEARCH_TOOL, r#"{"pregunta": "castillos"}"#),
                    {"type": "function", "function": {"name": SEARCH_TOOL, "arguments": "{}"}},
                ]
            }),
            json!({"role": "assistant", "content": "Listo"}),
        ]
        .into_iter();
        let mut sent = Vec::new();

        run_tool_rounds(
            "gpt-test",
            question(),
            |body| {
                sent.push(body);
                let next = replies.next();
                async move { next.ok_or_else(|| anyhow!("unexpected request")) }
            },
            search_castles,
        )
        .await
        .unwrap();

        let messages = sent[1]["messages"].as_array().unwrap();
        let turn = messages.iter().find(|m| m["role"] == "assistant").unwrap();
        let calls = turn["tool_calls"].as_array().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0]["id"], "call_1");
        assert_eq!(calls[0]["function"]["arguments"], r#"{"pregunta": "castillos"}"#);
    }

    #[tokio::test]
    async fn test_only_unreadable_tool_calls_is_error() {
        let err = run_tool_rounds(
            "gpt-test",
            question(),
            |_| async {
                Ok(json!({
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{"type": "function"}]
                }))
            },
            search_castles,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid chat response: unreadable tool calls");
    }

    #[test]
    fn test_chat_body_tools_only_in_first_round() {
        let messages = question();
        let first = chat_body("m", &messages, true);
        assert_eq!(first["tool_choice"], "auto");
        let second = chat_body("m", &messages, false);
        assert!(second.get("tools").is_none());
        assert_eq!(second["messages"], first["messages"]);
    }
}
