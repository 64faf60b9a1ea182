//! Sequential multi-property runs.
//!
//! Each property is checked and published on its own; a failure is logged
//! and recorded, and the run moves on to the next property.

use crate::config::CheckerConfig;
use crate::constraint::{self, ConstraintKind};
use crate::error::{CovibotError, CovibotResult};
use crate::property::PropertyId;
use crate::query::QueryService;
use crate::sink::{EDIT_SUMMARY, ReportSink};

/// Outcome of one property in a batch.
#[derive(Debug)]
pub struct PropertyOutcome {
    pub property: PropertyId,
    pub page: String,
}

/// Outcome of a whole batch.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub published: Vec<PropertyOutcome>,
    pub failed: Vec<(PropertyId, CovibotError)>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Check `kind` for one property and publish the report.
pub fn run_one(
    kind: ConstraintKind,
    config: &CheckerConfig,
    service: &dyn QueryService,
    sink: &mut dyn ReportSink,
    property: &PropertyId,
) -> CovibotResult<PropertyOutcome> {
    let checked = constraint::check(kind, config, service, property)?;
    let page = checked.report_page().to_string();
    sink.publish(&page, &checked.report_section(), EDIT_SUMMARY)?;
    Ok(PropertyOutcome {
        property: property.clone(),
        page,
    })
}

/// Check every property in turn.
pub fn run(
    kind: ConstraintKind,
    config: &CheckerConfig,
    service: &dyn QueryService,
    sink: &mut dyn ReportSink,
    properties: &[PropertyId],
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for property in properties {
        match run_one(kind, config, service, sink, property) {
            Ok(outcome) => summary.published.push(outcome),
            Err(e) => {
                tracing::error!(%property, constraint = %kind, error = %e, "constraint check failed");
                summary.failed.push((property.clone(), e));
            }
        }
    }
    tracing::info!(
        published = summary.published.len(),
        failed = summary.failed.len(),
        "batch complete"
    );
    summary
}
