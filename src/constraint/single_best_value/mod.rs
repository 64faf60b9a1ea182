//! Single best value constraint.
//!
//! A subject with more than one best-rank statement of the property is a
//! violation unless one of the separators declared on the constraint gives
//! every statement a distinct qualifier value.
//!
//! The check is a staged pipeline, each stage consuming the previous one's
//! immutable output:
//!
//! ```text
//! PropertyId -> Metadata -> ViolationQuery -> FetchedRows -> groups -> Report
//! ```

pub mod evaluate;
pub mod fetch;
pub mod metadata;
pub mod report;

use crate::config::CheckerConfig;
use crate::error::CovibotResult;
use crate::property::PropertyId;
use crate::query::QueryService;

use super::{Constraint, ConstraintKind};

pub use evaluate::{ViolationGroup, group_by_subject, is_excused};
pub use fetch::{FetchedRows, ViolationQuery, ViolationRow};
pub use metadata::{Formatter, Metadata};
pub use report::Report;

/// A completed single-best-value check of one property.
#[derive(Debug, Clone)]
pub struct SingleBestValueConstraint {
    property: PropertyId,
    report_page: String,
    metadata: Metadata,
    query: ViolationQuery,
    fetched: FetchedRows,
}

impl SingleBestValueConstraint {
    /// Resolve metadata, build and run the violation query for `property`.
    ///
    /// Issues three queries in sequence. Any query failure aborts the check.
    pub fn check(
        config: &CheckerConfig,
        service: &dyn QueryService,
        property: &PropertyId,
    ) -> CovibotResult<Self> {
        tracing::info!(%property, "checking single best value constraint");

        let metadata = metadata::resolve(config, service, property)?;
        let query = ViolationQuery::build(property, &metadata.separators);
        let fetched = fetch::fetch(config, service, &query)?;

        tracing::info!(
            %property,
            rows = fetched.rows.len(),
            separators = metadata.separators.len(),
            elapsed_secs = fetched.elapsed.as_secs_f64(),
            "fetched duplicate statements"
        );

        Ok(Self::from_parts(property.clone(), metadata, query, fetched))
    }

    /// Assemble a check from already computed stages.
    pub fn from_parts(
        property: PropertyId,
        metadata: Metadata,
        query: ViolationQuery,
        fetched: FetchedRows,
    ) -> Self {
        Self {
            report_page: ConstraintKind::SingleBestValue.report_page(&property),
            property,
            metadata,
            query,
            fetched,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn query(&self) -> &ViolationQuery {
        &self.query
    }

    pub fn rows(&self) -> &[ViolationRow] {
        &self.fetched.rows
    }

    /// Evaluate the fetched rows.
    pub fn report(&self) -> Report {
        Report::build(
            &self.fetched.rows,
            &self.metadata.separators,
            self.fetched.elapsed,
        )
    }
}

impl Constraint for SingleBestValueConstraint {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::SingleBestValue
    }

    fn property(&self) -> &PropertyId {
        &self.property
    }

    fn report_page(&self) -> &str {
        &self.report_page
    }

    fn report_section(&self) -> String {
        report::render(
            &self.fetched.rows,
            &self.metadata.formatter,
            &self.metadata.separators,
            self.fetched.elapsed,
        )
    }
}
