//! The boundary to whatever carries GraphQL requests to an endpoint.

use std::fmt;

use async_trait::async_trait;

/// Sends a document with its variables and returns the decoded JSON response.
///
/// Connection handling, authentication, retries and timeouts all belong to the
/// implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        endpoint: &str,
        document: &str,
        variables: &serde_json::Value,
    ) -> Result<serde_json::Value, TransportError>;
}

/// An opaque failure reported by a [`Transport`].
#[derive(Debug)]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    pub fn new(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> TransportError {
        TransportError(error.into())
    }

    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync> {
        self.0
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}
