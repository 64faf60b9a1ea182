//! Wikitext report of the violations that no separator excuses.

use std::time::Duration;

use crate::property::PropertyId;

use super::evaluate::{group_by_subject, is_excused};
use super::fetch::ViolationRow;
use super::metadata::Formatter;

/// One subject whose duplicates are not excused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub subject: String,
    /// Duplicated values, one per fetched row, sorted.
    pub identifiers: Vec<String>,
}

/// Evaluated result of one check, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub elapsed: Duration,
    pub separators: Vec<PropertyId>,
    /// Distinct subjects in the fetched rows.
    pub subjects: usize,
    /// Subjects excused by a separator.
    pub excused: usize,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Group `rows` by subject and evaluate each group.
    pub fn build(rows: &[ViolationRow], separators: &[PropertyId], elapsed: Duration) -> Self {
        let groups = group_by_subject(rows);
        let subjects = groups.len();
        let mut excused = 0;
        let mut entries = Vec::new();

        for group in &groups {
            if is_excused(group) {
                excused += 1;
                continue;
            }
            entries.push(ReportEntry {
                subject: group.subject.to_string(),
                identifiers: group.identifiers().into_iter().map(str::to_string).collect(),
            });
        }

        Self {
            elapsed,
            separators: separators.to_vec(),
            subjects,
            excused,
            entries,
        }
    }

    /// Subjects reported as violations.
    pub fn violations(&self) -> usize {
        self.subjects - self.excused
    }

    /// Render as wikitext, linking identifiers through `formatter`.
    pub fn to_wikitext(&self, formatter: &Formatter) -> String {
        let separators = if self.separators.is_empty() {
            "none".to_string()
        } else {
            self.separators
                .iter()
                .map(|s| format!("{{{{Property|{s}}}}}"))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut lines = vec![
            format!("Query time: {:.1} sec<br>", self.elapsed.as_secs_f64()),
            format!("Defined separators: {separators}<br>"),
            format!("Violations count: {} items", self.violations()),
        ];

        for entry in &self.entries {
            let links: Vec<String> = entry.identifiers.iter().map(|id| formatter.link(id)).collect();
            lines.push(format!("# {{{{Q|{}}}}}: {}", entry.subject, links.join(", ")));
        }

        lines.join("\n")
    }
}

/// Evaluate `rows` and render the report text.
pub fn render(
    rows: &[ViolationRow],
    formatter: &Formatter,
    separators: &[PropertyId],
    elapsed: Duration,
) -> String {
    Report::build(rows, separators, elapsed).to_wikitext(formatter)
}
