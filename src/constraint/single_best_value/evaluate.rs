//! Per-subject grouping and the separator exception rule.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::fetch::ViolationRow;

/// All rows of one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationGroup<'a> {
    pub subject: &'a str,
    pub rows: Vec<&'a ViolationRow>,
}

impl<'a> ViolationGroup<'a> {
    /// Distinct statement identifiers of the group.
    pub fn statements(&self) -> BTreeSet<&'a str> {
        self.rows.iter().map(|r| r.statement.as_str()).collect()
    }

    /// Identifier of every row, sorted lexicographically.
    ///
    /// A statement with several separator rows is listed once per row.
    pub fn identifiers(&self) -> Vec<&'a str> {
        let mut identifiers: Vec<&'a str> =
            self.rows.iter().map(|r| r.identifier.as_str()).collect();
        identifiers.sort_unstable();
        identifiers
    }

    /// Separator predicates present in the group, in first-appearance order.
    fn separators(&self) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter_map(|r| r.separator.as_deref())
            .filter(|s| seen.insert(*s))
            .collect()
    }
}

/// Group rows by subject, in the order subjects first appear.
pub fn group_by_subject(rows: &[ViolationRow]) -> Vec<ViolationGroup<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<ViolationGroup<'_>> = Vec::new();
    for row in rows {
        let slot = *index.entry(row.subject.as_str()).or_insert_with(|| {
            groups.push(ViolationGroup {
                subject: row.subject.as_str(),
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].rows.push(row);
    }
    groups
}

/// Whether a separator excuses the duplication in `group`.
///
/// Some separator must qualify every statement of the group, and the values
/// it takes across those rows must all differ. Rows are not deduplicated, so
/// a statement listed twice with the same value counts as a collision, and a
/// missing value collides with another missing value.
pub fn is_excused(group: &ViolationGroup<'_>) -> bool {
    let statements = group.statements();

    group.separators().into_iter().any(|separator| {
        let carrying: Vec<&ViolationRow> = group
            .rows
            .iter()
            .copied()
            .filter(|r| r.separator.as_deref() == Some(separator))
            .collect();

        let covered: BTreeSet<&str> = carrying.iter().map(|r| r.statement.as_str()).collect();
        if covered != statements {
            return false;
        }

        let mut values = HashSet::with_capacity(carrying.len());
        carrying
            .iter()
            .all(|r| values.insert(r.separator_value.as_deref()))
    })
}
