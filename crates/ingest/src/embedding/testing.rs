//! Single-reply transport shared by the remote embedder tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scholar_llm::{HttpReply, HttpTransport, LlmError};

type Sent = (String, Vec<(String, String)>, serde_json::Value);

pub(crate) struct OneReply {
    reply: HttpReply,
    sent: Mutex<Vec<Sent>>,
}

impl OneReply {
    pub(crate) fn new(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: HttpReply {
                status,
                retry_after: None,
                content_type: Some("application/json".into()),
                body: body.to_string(),
            },
            sent: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn ok(body: &str) -> Arc<Self> {
        Self::new(200, body)
    }

    pub(crate) fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub(crate) fn last(&self) -> Sent {
        self.sent.lock().unwrap().last().cloned().expect("no request sent")
    }
}

#[async_trait]
impl HttpTransport for OneReply {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<HttpReply, LlmError> {
        self.sent
            .lock()
            .unwrap()
            .push((url.to_string(), headers.to_vec(), body.clone()));
        Ok(self.reply.clone())
    }
}
