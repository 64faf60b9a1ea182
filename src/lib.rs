// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # covibot
//!
//! Constraint violation reports for Wikidata properties.
//!
//! For a property carrying the single best value constraint, covibot finds
//! every subject with more than one best-rank statement, drops the subjects
//! whose statements are told apart by a declared separator qualifier, and
//! renders the rest as a wikitext report.
//!
//! ## Architecture
//!
//! - **Configuration** (`config`): endpoint, user agent and namespaces, passed by reference
//! - **Query service** (`query`): `QueryService` trait with a blocking `ureq` client
//! - **Constraints** (`constraint`): the `Constraint` capability and the
//!   single best value pipeline (metadata, fetch, evaluate, report)
//! - **Sinks** (`sink`): where finished reports go
//! - **Batches** (`batch`): one property after another, failures isolated
//!
//! ## Library usage
//!
//! ```no_run
//! use covibot::config::CheckerConfig;
//! use covibot::constraint::{Constraint, SingleBestValueConstraint};
//! use covibot::query::WdqsClient;
//!
//! let config = CheckerConfig::default();
//! let client = WdqsClient::new(&config);
//! let property = "P227".parse().unwrap();
//! let check = SingleBestValueConstraint::check(&config, &client, &property).unwrap();
//! println!("{}\n{}", check.report_page(), check.report_section());
//! ```

pub mod batch;
pub mod config;
pub mod constraint;
pub mod error;
pub mod property;
pub mod query;
pub mod sink;
