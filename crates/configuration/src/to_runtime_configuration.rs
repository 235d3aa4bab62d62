//! Convert a parsed configuration into the runtime configuration.

use crate::configuration::Configuration;
use crate::environment::Environment;
use crate::error::MakeRuntimeConfigurationError;
use crate::version1::ParsedConfiguration;

/// Resolve every secret of `parsed_config` and check the values make sense.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
    environment: impl Environment,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    let endpoint = parsed_config.endpoint.resolve(&environment).map_err(|source| {
        MakeRuntimeConfigurationError::MissingEnvironmentVariable {
            field: "endpoint".to_string(),
            source,
        }
    })?;
    let endpoint = url::Url::parse(&endpoint).map_err(|err| {
        MakeRuntimeConfigurationError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            message: err.to_string(),
        }
    })?;
    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(MakeRuntimeConfigurationError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            message: "the scheme must be http or https".to_string(),
        });
    }

    let headers = parsed_config
        .headers
        .into_iter()
        .map(|(name, value)| {
            let value = value.resolve(&environment).map_err(|source| {
                MakeRuntimeConfigurationError::MissingEnvironmentVariable {
                    field: format!("headers.{name}"),
                    source,
                }
            })?;
            Ok((name, value))
        })
        .collect::<Result<_, MakeRuntimeConfigurationError>>()?;

    if parsed_config.flattening.max_rows == 0 {
        return Err(MakeRuntimeConfigurationError::InvalidMaxRows);
    }

    Ok(Configuration {
        endpoint,
        headers,
        max_rows: parsed_config.flattening.max_rows,
    })
}
