//! Rich diagnostic error types for covibot.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so an operator knows which property
//! check failed and why.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::sink::SinkError;

/// Top-level error type for covibot.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum CovibotError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Sink(#[from] SinkError),
}

// ---------------------------------------------------------------------------
// Query service errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum QueryError {
    #[error("query service unreachable at {endpoint}: {message}")]
    #[diagnostic(
        code(covibot::query::transport),
        help(
            "The SPARQL endpoint could not be contacted. Check network access \
             and the `endpoint` setting in the config file."
        )
    )]
    Transport { endpoint: String, message: String },

    #[error("query service returned HTTP {status}: {preview}")]
    #[diagnostic(
        code(covibot::query::status),
        help(
            "The endpoint rejected the query. A 400 usually means invalid SPARQL, \
             429 or 503 means the service is throttling; run the check again later."
        )
    )]
    Status { status: u16, preview: String },

    #[error("failed to read query response body: {source}")]
    #[diagnostic(
        code(covibot::query::body),
        help("The connection was interrupted while the response was streaming.")
    )]
    Body {
        #[source]
        source: std::io::Error,
    },

    #[error("malformed query response: {message}")]
    #[diagnostic(
        code(covibot::query::malformed),
        help(
            "The response did not have the expected columns or values. \
             No partial report is produced for this property."
        )
    )]
    MalformedResponse { message: String },
}

/// Convenience alias for query-service results.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Convenience alias for functions returning covibot results.
pub type CovibotResult<T> = std::result::Result<T, CovibotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_converts_to_covibot_error() {
        let err = QueryError::Status {
            status: 503,
            preview: "busy".into(),
        };
        let top: CovibotError = err.into();
        assert!(matches!(
            top,
            CovibotError::Query(QueryError::Status { status: 503, .. })
        ));
    }

    #[test]
    fn config_error_converts_to_covibot_error() {
        let err = ConfigError::InvalidProperty {
            value: "Q42".into(),
        };
        let top: CovibotError = err.into();
        assert!(matches!(
            top,
            CovibotError::Config(ConfigError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = QueryError::Transport {
            endpoint: "https://example.org/sparql".into(),
            message: "connection refused".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("https://example.org/sparql"));
        assert!(msg.contains("connection refused"));
    }
}
