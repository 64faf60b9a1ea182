//! Duplicate-claim query and normalization of its CSV result.

use std::time::Duration;

use crate::config::CheckerConfig;
use crate::error::{QueryError, QueryResult};
use crate::property::PropertyId;
use crate::query::{QueryService, ResultFormat, timed};

/// Number of columns in the violation table, in order: subject, identifier,
/// statement, separator, separator value.
const COLUMNS: usize = 5;

/// One subject/identifier/qualifier combination returned by the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationRow {
    /// Subject identifier without namespace, e.g. `Q42`.
    pub subject: String,
    /// Numeric part of `subject`, used as sort key.
    pub subject_num: u64,
    /// The duplicated property value.
    pub identifier: String,
    /// Statement identifier without namespace.
    pub statement: String,
    /// Separator qualifier predicate on the statement, if any.
    pub separator: Option<String>,
    /// Value of that qualifier.
    pub separator_value: Option<String>,
}

/// Rows of one fetch, sorted by subject, and how long the query took.
#[derive(Debug, Clone, Default)]
pub struct FetchedRows {
    pub rows: Vec<ViolationRow>,
    pub elapsed: Duration,
}

/// SPARQL text selecting best-rank duplicates of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationQuery(String);

impl ViolationQuery {
    /// Subjects with more than one direct value of `property`, joined to each
    /// best-rank statement and any of `separators` qualifying it.
    pub fn build(property: &PropertyId, separators: &[PropertyId]) -> Self {
        let mut query = format!(
            "SELECT ?item ?identifier ?s ?separator ?separator_value WITH {{
  SELECT ?item WHERE {{
    ?item wdt:{property} ?identifier
  }} GROUP BY ?item HAVING(COUNT(?identifier) > 1)
}} AS %subquery WHERE {{
  INCLUDE %subquery .
  ?item p:{property} ?s .
  ?s ps:{property} ?identifier; rdf:type wikibase:BestRank .
"
        );

        // An empty VALUES list would not parse, and without separators the
        // qualifier columns are simply left unbound.
        if !separators.is_empty() {
            let values: Vec<String> = separators.iter().map(|s| format!("pq:{s}")).collect();
            query.push_str(&format!(
                "  OPTIONAL {{
    VALUES ?separator {{
      {}
    }}
    ?s ?separator ?separator_value .
  }}
",
                values.join(" ")
            ));
        }

        query.push('}');
        Self(query)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Run `query` once and return the normalized, sorted rows.
pub fn fetch(
    config: &CheckerConfig,
    service: &dyn QueryService,
    query: &ViolationQuery,
) -> QueryResult<FetchedRows> {
    let (body, elapsed) = timed(|| service.query(query.as_str(), ResultFormat::Csv));
    let body = body?;
    let rows = parse_rows(config, &body)?;
    tracing::debug!(rows = rows.len(), elapsed_ms = elapsed.as_millis() as u64, "fetched violation rows");
    Ok(FetchedRows { rows, elapsed })
}

/// Parse the CSV table, normalize identifiers, drop non-subject rows and sort.
pub fn parse_rows(config: &CheckerConfig, body: &str) -> QueryResult<Vec<ViolationRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| QueryError::MalformedResponse {
            message: format!("violation table: {e}"),
        })?;
        if record.len() != COLUMNS {
            return Err(QueryError::MalformedResponse {
                message: format!(
                    "violation table row {} has {} columns, expected {COLUMNS}",
                    index + 1,
                    record.len()
                ),
            });
        }

        let subject = strip_namespace(&record[0], &config.entity_namespace);
        let Some(suffix) = subject.strip_prefix(config.entity_marker.as_str()) else {
            dropped += 1;
            continue;
        };
        let subject_num: u64 = suffix.parse().map_err(|_| QueryError::MalformedResponse {
            message: format!("subject \"{subject}\" has no numeric identifier"),
        })?;

        rows.push(ViolationRow {
            subject_num,
            subject: subject.to_string(),
            identifier: record[1].to_string(),
            statement: strip_namespace(&record[2], &config.statement_namespace).to_string(),
            separator: non_empty(strip_namespace(&record[3], &config.qualifier_namespace)),
            separator_value: non_empty(&record[4]),
        });
    }

    if dropped > 0 {
        tracing::debug!(dropped, marker = %config.entity_marker, "dropped rows with non-entity subjects");
    }

    sort_rows(&mut rows);
    Ok(rows)
}

/// Stable ascending sort by subject number.
pub fn sort_rows(rows: &mut [ViolationRow]) {
    rows.sort_by_key(|row| row.subject_num);
}

/// Remove `namespace` from the front of `value`; values without it pass through.
pub fn strip_namespace<'a>(value: &'a str, namespace: &str) -> &'a str {
    value.strip_prefix(namespace).unwrap_or(value)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
