//! A transport answering from a script, for tests that must not touch the network.

use std::collections::VecDeque;

use async_trait::async_trait;
use query_engine_execution::transport::{Transport, TransportError};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::fixtures::media_schema_response;

/// One request seen by a [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: String,
    pub document: String,
    pub variables: Value,
}

impl RecordedCall {
    pub fn is_introspection(&self) -> bool {
        self.document.contains("__schema")
    }
}

/// Answers requests with scripted responses, in order, and records every call.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Result<Value, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose first answer is the introspection of the media schema.
    pub fn introspected() -> Self {
        Self::new().respond(media_schema_response())
    }

    #[must_use]
    pub fn respond(mut self, response: Value) -> Self {
        self.script.get_mut().push_back(Ok(response));
        self
    }

    /// Answer a `{"data": ...}` response.
    #[must_use]
    pub fn respond_data(self, data: Value) -> Self {
        self.respond(serde_json::json!({ "data": data }))
    }

    #[must_use]
    pub fn fail(mut self, message: &str) -> Self {
        self.script.get_mut().push_back(Err(message.to_string()));
        self
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn introspection_count(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| call.is_introspection())
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(
        &self,
        endpoint: &str,
        document: &str,
        variables: &Value,
    ) -> Result<Value, TransportError> {
        self.calls.lock().await.push(RecordedCall {
            endpoint: endpoint.to_string(),
            document: document.to_string(),
            variables: variables.clone(),
        });
        match self.script.lock().await.pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::new(message)),
            None => Err(TransportError::new("no scripted response left")),
        }
    }
}
