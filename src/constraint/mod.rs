//! Constraint checks and the capability they share with report writers.
//!
//! A check is constructed by running its whole query pipeline, so a value
//! implementing [`Constraint`] is always fully populated. Report writers
//! only need the target page and the report text.

pub mod single_best_value;

use std::fmt;

use crate::config::CheckerConfig;
use crate::error::CovibotResult;
use crate::property::PropertyId;
use crate::query::QueryService;

pub use single_best_value::SingleBestValueConstraint;

/// Constraint types covibot can audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum ConstraintKind {
    /// Properties that should have a single preferred value per subject.
    #[default]
    SingleBestValue,
}

impl ConstraintKind {
    /// Item identifying the constraint type on property pages.
    pub fn item(self) -> &'static str {
        match self {
            ConstraintKind::SingleBestValue => "Q52060874",
        }
    }

    /// Human-readable constraint name.
    pub fn label(self) -> &'static str {
        match self {
            ConstraintKind::SingleBestValue => "Single best value constraint",
        }
    }

    /// Title of the page the report for `property` is written to.
    pub fn report_page(self, property: &PropertyId) -> String {
        format!(
            "Property talk:{property}/Constraint violations/{}",
            self.label()
        )
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A completed constraint check that can be written to a report sink.
pub trait Constraint {
    /// The constraint type that was checked.
    fn kind(&self) -> ConstraintKind;

    /// The property that was checked.
    fn property(&self) -> &PropertyId;

    /// Title of the target report page.
    fn report_page(&self) -> &str;

    /// Full report text for the target page.
    fn report_section(&self) -> String;
}

/// Run the check of `kind` for `property`.
pub fn check(
    kind: ConstraintKind,
    config: &CheckerConfig,
    service: &dyn QueryService,
    property: &PropertyId,
) -> CovibotResult<Box<dyn Constraint>> {
    match kind {
        ConstraintKind::SingleBestValue => Ok(Box::new(SingleBestValueConstraint::check(
            config, service, property,
        )?)),
    }
}
