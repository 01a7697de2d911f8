use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use super::*;

// ── Scripted transport ──────────────────────────────────────────────

#[derive(Debug, Clone)]
struct SentRequest {
    url: String,
    headers: Vec<(String, String)>,
    body: serde_json::Value,
}

#[derive(Default)]
struct ScriptedTransport {
    replies: Mutex<VecDeque<HttpReply>>,
    sent: Mutex<Vec<SentRequest>>,
}

impl ScriptedTransport {
    fn new(replies: Vec<HttpReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<HttpReply, LlmError> {
        self.sent.lock().unwrap().push(SentRequest {
            url: url.to_string(),
            headers: headers.to_vec(),
            body: body.clone(),
        });
        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more often than scripted"))
    }
}

fn ok(content: &str) -> HttpReply {
    HttpReply {
        status: 200,
        retry_after: None,
        content_type: Some("application/json".into()),
        body: json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string(),
    }
}

fn status(code: u16) -> HttpReply {
    HttpReply {
        status: code,
        retry_after: None,
        content_type: Some("application/json".into()),
        body: format!("{{\"error\":\"status {code}\"}}"),
    }
}

fn too_many(retry_after: Option<&str>) -> HttpReply {
    HttpReply {
        retry_after: retry_after.map(str::to_string),
        ..status(429)
    }
}

fn provider(kind: ProviderKind) -> ResolvedProvider {
    ResolvedProvider {
        kind,
        base_url: kind.default_base_url().to_string(),
        api_key: "secret".into(),
        model: kind.default_model().into(),
        auth_style: AuthStyle::Bearer,
    }
}

fn client(kind: ProviderKind, transport: &Arc<ScriptedTransport>) -> ChatClient {
    ChatClient::new(Some(provider(kind)), transport.clone())
}

fn auth_header(req: &SentRequest) -> (String, String) {
    req.headers[0].clone()
}

// ── Configuration ───────────────────────────────────────────────────

#[tokio::test]
async fn unset_client_fails_before_network() {
    let transport = ScriptedTransport::new(vec![]);
    let client = ChatClient::new(None, transport.clone());
    assert!(client.provider().is_none());

    let err = client.generate("hi", 0.0).await.unwrap_err();
    assert_eq!(err.to_string(), NO_API_KEY);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn blank_key_or_url_fails_before_network() {
    let transport = ScriptedTransport::new(vec![]);
    let mut p = provider(ProviderKind::OpenAi);
    p.api_key = "  ".into();
    let err = ChatClient::new(Some(p), transport.clone())
        .generate("hi", 0.0)
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::NotConfigured(_)));

    let mut p = provider(ProviderKind::OpenAi);
    p.base_url = String::new();
    let err = ChatClient::new(Some(p), transport.clone())
        .generate("hi", 0.0)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), NO_BASE_URL);
    assert_eq!(transport.calls(), 0);
}

#[test]
fn from_config_rejects_forced_provider_without_key() {
    let vars: HashMap<String, String> = [("LLM_PROVIDER", "scaledown"), ("GROQ_API_KEY", "g")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = scholar_core::Config::from_map(&vars);
    let transport = ScriptedTransport::new(vec![]);

    let err = ChatClient::from_config(&config.llm, None, transport.clone())
        .err()
        .unwrap();
    assert_eq!(
        err.to_string(),
        "LLM_PROVIDER=scaledown but SCALEDOWN_API_KEY is not set."
    );
    assert_eq!(transport.calls(), 0);
}

// ── Success ─────────────────────────────────────────────────────────

#[tokio::test]
async fn success_returns_message_content() {
    let transport = ScriptedTransport::new(vec![ok("A summary.")]);
    let client = client(ProviderKind::Groq, &transport);

    let text = client.generate("Summarize", 0.0).await.unwrap();
    assert_eq!(text, "A summary.");

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, "https://api.groq.com/openai/v1/chat/completions");
    assert_eq!(auth_header(&sent[0]), ("Authorization".into(), "Bearer secret".into()));
    assert_eq!(sent[0].body["model"], "llama-3.3-70b-versatile");
    assert_eq!(sent[0].body["messages"][0]["role"], "user");
    assert_eq!(sent[0].body["messages"][0]["content"], "Summarize");
    assert_eq!(sent[0].body["temperature"], 0.0);
}

#[tokio::test]
async fn missing_content_is_parse_error() {
    let reply = HttpReply {
        body: json!({"choices": []}).to_string(),
        ..ok("")
    };
    let transport = ScriptedTransport::new(vec![reply]);
    let err = client(ProviderKind::OpenAi, &transport)
        .generate("x", 0.0)
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::ParseError(_)));
}

// ── 401 / 403 ───────────────────────────────────────────────────────

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let transport = ScriptedTransport::new(vec![status(401)]);
    let err = client(ProviderKind::Groq, &transport)
        .generate("x", 0.0)
        .await
        .unwrap_err();

    assert!(err
        .to_string()
        .starts_with("401 Unauthorized: invalid Groq API key. Set GROQ_API_KEY"));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn scaledown_forbidden_retries_once_with_alternate_header() {
    let transport = ScriptedTransport::new(vec![status(403), ok("recovered"), ok("again")]);
    let client = client(ProviderKind::ScaleDown, &transport);

    assert_eq!(client.generate("x", 0.0).await.unwrap(), "recovered");
    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(auth_header(&sent[0]).0, "Authorization");
    assert_eq!(auth_header(&sent[1]), ("x-api-key".into(), "secret".into()));
    assert_eq!(sent[0].body, sent[1].body);

}

#[tokio::test]
async fn next_call_starts_from_configured_style() {
    let transport = ScriptedTransport::new(vec![status(403), status(403), ok("fresh")]);
    let client = client(ProviderKind::ScaleDown, &transport);

    assert!(client.generate("x", 0.0).await.is_err());
    assert_eq!(client.generate("y", 0.0).await.unwrap(), "fresh");

    let sent = transport.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(auth_header(&sent[1]).0, "x-api-key");
    assert_eq!(auth_header(&sent[2]), ("Authorization".into(), "Bearer secret".into()));
    assert_eq!(client.provider().map(|p| p.auth_style), Some(AuthStyle::Bearer));
}

#[tokio::test]
async fn configured_api_key_style_alternates_to_bearer() {
    let mut p = provider(ProviderKind::ScaleDown);
    p.auth_style = AuthStyle::ApiKeyHeader;
    let transport = ScriptedTransport::new(vec![status(403), ok("ok"), ok("ok")]);
    let client = ChatClient::new(Some(p), transport.clone());

    client.generate("x", 0.0).await.unwrap();
    client.generate("y", 0.0).await.unwrap();

    let sent = transport.sent();
    assert_eq!(auth_header(&sent[0]).0, "x-api-key");
    assert_eq!(auth_header(&sent[1]).0, "Authorization");
    assert_eq!(auth_header(&sent[2]).0, "x-api-key");
}

#[tokio::test]
async fn scaledown_forbidden_twice_fails_after_one_retry() {
    let transport = ScriptedTransport::new(vec![status(403), status(403)]);
    let err = client(ProviderKind::ScaleDown, &transport)
        .generate("x", 0.0)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::ApiError { status: 403, .. }));
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn forbidden_on_other_providers_is_not_retried() {
    for kind in [ProviderKind::Groq, ProviderKind::OpenAi] {
        let transport = ScriptedTransport::new(vec![status(403)]);
        let err = client(kind, &transport).generate("x", 0.0).await.unwrap_err();
        assert!(matches!(err, LlmError::ApiError { status: 403, .. }));
        assert_eq!(transport.calls(), 1);
    }
}

// ── 429 ─────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn rate_limit_then_success() {
    let transport = ScriptedTransport::new(vec![too_many(None), ok("after wait")]);
    let client = client(ProviderKind::OpenAi, &transport);

    let started = tokio::time::Instant::now();
    assert_eq!(client.generate("x", 0.0).await.unwrap(), "after wait");
    let waited = started.elapsed();

    assert_eq!(transport.calls(), 2);
    assert!(waited >= Duration::from_secs(2) && waited < Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn retry_after_is_capped() {
    let transport = ScriptedTransport::new(vec![too_many(Some("3600")), ok("done")]);
    let client = client(ProviderKind::Groq, &transport);

    let started = tokio::time::Instant::now();
    client.generate("x", 0.0).await.unwrap();
    let waited = started.elapsed();

    assert!(waited >= Duration::from_secs(60) && waited < Duration::from_secs(61));
}

#[tokio::test(start_paused = true)]
async fn rate_limit_gives_up_after_max_retries() {
    let transport = ScriptedTransport::new((0..5).map(|_| too_many(Some("1"))).collect());
    let err = client(ProviderKind::Groq, &transport)
        .generate("x", 0.0)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "429 Too Many Requests: Groq rate limit hit. Wait a minute and try again."
    );
    assert_eq!(transport.calls(), 5);
}

#[tokio::test(start_paused = true)]
async fn rate_limit_after_forbidden_keeps_alternate_header() {
    let transport = ScriptedTransport::new(vec![status(403), too_many(Some("1")), ok("done")]);
    let client = client(ProviderKind::ScaleDown, &transport);

    assert_eq!(client.generate("x", 0.0).await.unwrap(), "done");

    let sent = transport.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(auth_header(&sent[0]).0, "Authorization");
    assert_eq!(auth_header(&sent[1]), ("x-api-key".into(), "secret".into()));
    assert_eq!(auth_header(&sent[2]), ("x-api-key".into(), "secret".into()));
}

#[tokio::test(start_paused = true)]
async fn rate_limit_stops_on_first_other_status() {
    let transport = ScriptedTransport::new(vec![too_many(None), status(500)]);
    let err = client(ProviderKind::OpenAi, &transport)
        .generate("x", 0.0)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::ApiError { status: 500, .. }));
    assert_eq!(transport.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn custom_policy_is_honoured() {
    let transport = ScriptedTransport::new(vec![too_many(None), too_many(None)]);
    let client = client(ProviderKind::OpenAi, &transport).with_retry_policy(RetryPolicy {
        max_retries: 1,
        initial_backoff: Duration::from_millis(10),
        max_wait: Duration::from_secs(1),
    });

    let err = client.generate("x", 0.0).await.unwrap_err();
    assert!(matches!(err, LlmError::RateLimited { .. }));
    assert_eq!(transport.calls(), 2);
}
