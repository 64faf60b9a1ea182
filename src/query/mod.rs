//! SPARQL query service access.
//!
//! [`QueryService`] is the seam between the constraint checks and the
//! network. [`WdqsClient`] implements it with a blocking `ureq` agent;
//! tests substitute canned responses.

pub mod results;

use std::io::Read;
use std::time::Duration;

use crate::config::CheckerConfig;
use crate::error::{QueryError, QueryResult};

pub use results::{Solution, parse_solutions};

/// Maximum number of body bytes quoted in a status error.
const ERROR_PREVIEW_LEN: usize = 500;

/// Response encoding requested from the query service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultFormat {
    /// SPARQL 1.1 query results JSON.
    Json,
    /// Comma-separated values with a header row.
    Csv,
}

impl ResultFormat {
    /// Value of the `Accept` header for this format.
    pub fn accept(self) -> &'static str {
        match self {
            ResultFormat::Json => "application/sparql-results+json",
            ResultFormat::Csv => "text/csv",
        }
    }
}

/// Something that can execute a SPARQL query and return the raw body.
pub trait QueryService {
    /// Execute `sparql`, returning the response body in the requested format.
    ///
    /// Unreachable endpoints and non-success statuses are errors; an empty
    /// body is not.
    fn query(&self, sparql: &str, format: ResultFormat) -> QueryResult<String>;
}

impl<T: QueryService + ?Sized> QueryService for &T {
    fn query(&self, sparql: &str, format: ResultFormat) -> QueryResult<String> {
        (**self).query(sparql, format)
    }
}

/// Blocking HTTP client for a Wikidata-style query service.
pub struct WdqsClient {
    endpoint: String,
    http: ureq::Agent,
}

impl WdqsClient {
    /// Build a client for the endpoint and user agent in `config`.
    pub fn new(config: &CheckerConfig) -> Self {
        let http = ureq::AgentBuilder::new()
            .user_agent(&config.user_agent)
            .build();
        Self {
            endpoint: config.endpoint.clone(),
            http,
        }
    }

    /// The endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl QueryService for WdqsClient {
    fn query(&self, sparql: &str, format: ResultFormat) -> QueryResult<String> {
        let mut form = vec![("query", sparql)];
        if format == ResultFormat::Json {
            form.push(("format", "json"));
        }

        tracing::debug!(endpoint = %self.endpoint, ?format, bytes = sparql.len(), "posting query");

        let response = match self
            .http
            .post(&self.endpoint)
            .set("Accept", format.accept())
            .send_form(&form)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(QueryError::Status {
                    status,
                    preview: preview(&body),
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(QueryError::Transport {
                    endpoint: self.endpoint.clone(),
                    message: transport.to_string(),
                });
            }
        };

        // `into_string` caps bodies at 10 MB; violation tables can be larger.
        let mut body = String::new();
        response
            .into_reader()
            .read_to_string(&mut body)
            .map_err(|source| QueryError::Body { source })?;
        Ok(body)
    }
}

/// Shorten a response body for inclusion in an error message.
fn preview(body: &str) -> String {
    if body.len() <= ERROR_PREVIEW_LEN {
        return body.trim().to_string();
    }
    let mut end = ERROR_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", body[..end].trim_end())
}

/// How long a closure took, alongside its result.
pub(crate) fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = std::time::Instant::now();
    let value = f();
    (value, start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_headers_match_format() {
        assert_eq!(ResultFormat::Csv.accept(), "text/csv");
        assert!(ResultFormat::Json.accept().contains("json"));
    }

    #[test]
    fn preview_truncates_long_bodies_on_char_boundary() {
        let body = "é".repeat(400);
        let short = preview(&body);
        assert!(short.ends_with("..."));
        assert!(short.len() <= ERROR_PREVIEW_LEN + 3);
    }

    #[test]
    fn preview_keeps_short_bodies() {
        assert_eq!(preview("  bad query \n"), "bad query");
    }

    #[test]
    fn client_uses_configured_endpoint() {
        let config = CheckerConfig::default().with_endpoint("http://127.0.0.1:1/sparql");
        let client = WdqsClient::new(&config);
        assert_eq!(client.endpoint(), "http://127.0.0.1:1/sparql");
    }

    #[test]
    fn unreachable_endpoint_is_transport_error() {
        // Port 1 on loopback refuses connections.
        let config = CheckerConfig::default().with_endpoint("http://127.0.0.1:1/sparql");
        let client = WdqsClient::new(&config);
        let err = client.query("ASK {}", ResultFormat::Json).unwrap_err();
        assert!(matches!(err, QueryError::Transport { .. }));
    }

    #[test]
    fn timed_reports_elapsed() {
        let (value, elapsed) = timed(|| 7);
        assert_eq!(value, 7);
        assert!(elapsed <= Duration::from_secs(1));
    }
}
