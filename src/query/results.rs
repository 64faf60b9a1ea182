//! Parsing of SPARQL 1.1 JSON result sets.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{QueryError, QueryResult};

#[derive(Debug, Deserialize)]
struct ResultSet {
    #[serde(default)]
    results: Bindings,
}

#[derive(Debug, Default, Deserialize)]
struct Bindings {
    #[serde(default)]
    bindings: Vec<HashMap<String, Term>>,
}

#[derive(Debug, Deserialize)]
struct Term {
    value: String,
}

/// One solution of a SELECT query: variable name to bound value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    values: HashMap<String, String>,
}

impl Solution {
    /// Value bound to `var`, if any.
    pub fn get(&self, var: &str) -> Option<&str> {
        self.values.get(var).map(String::as_str)
    }
}

/// Parse a JSON result body into solutions, in response order.
pub fn parse_solutions(body: &str) -> QueryResult<Vec<Solution>> {
    let set: ResultSet =
        serde_json::from_str(body).map_err(|e| QueryError::MalformedResponse {
            message: format!("invalid SPARQL JSON results: {e}"),
        })?;
    Ok(set
        .results
        .bindings
        .into_iter()
        .map(|row| Solution {
            values: row.into_iter().map(|(var, term)| (var, term.value)).collect(),
        })
        .collect())
}

/// Values bound to `var` across solutions; solutions without it are skipped.
pub fn column(solutions: &[Solution], var: &str) -> Vec<String> {
    solutions
        .iter()
        .filter_map(|s| s.get(var))
        .map(str::to_string)
        .collect()
}
