//! GraphQL over HTTP.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{json, Value};

use query_engine_execution::transport::{Transport, TransportError};

use crate::error::Error;

/// POSTs `{"query", "variables"}` as JSON and decodes the JSON answer.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// A transport sending `headers` with every request.
    pub fn new(headers: &BTreeMap<String, String>) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .default_headers(header_map(headers)?)
            .build()
            .map_err(Error::HttpClient)?;
        Ok(Self { client })
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, Error> {
    headers
        .iter()
        .map(|(name, value)| {
            let invalid = |message: String| Error::InvalidHeader {
                name: name.clone(),
                message,
            };
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|err| invalid(err.to_string()))?;
            let mut header_value =
                HeaderValue::from_str(value).map_err(|err| invalid(err.to_string()))?;
            header_value.set_sensitive(true);
            Ok((header_name, header_value))
        })
        .collect()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        endpoint: &str,
        document: &str,
        variables: &Value,
    ) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(endpoint)
            .json(&json!({ "query": document, "variables": variables }))
            .send()
            .await
            .map_err(TransportError::new)?;

        let status = response.status();
        let body = response.bytes().await.map_err(TransportError::new)?;

        // servers answer GraphQL errors with 4xx codes too; keep their bodies
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) if status.is_success() || value.get("errors").is_some() => Ok(value),
            Ok(_) => Err(TransportError::new(format!("HTTP status {status}"))),
            Err(err) if status.is_success() => Err(TransportError::new(err)),
            Err(_) => Err(TransportError::new(format!("HTTP status {status}"))),
        }
    }
}
