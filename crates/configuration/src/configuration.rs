//! Configuration for a session.

use std::collections::BTreeMap;

/// The 'Configuration' type collects all the information necessary to run queries.
///
/// Values of this type are produced from a 'ParsedConfiguration' using
/// 'make_runtime_configuration', once every secret has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// The GraphQL endpoint queries are sent to.
    pub endpoint: url::Url,
    /// Extra HTTP headers sent with every request.
    pub headers: BTreeMap<String, String>,
    /// Upper bound on the rows produced when flattening one response.
    pub max_rows: usize,
}
