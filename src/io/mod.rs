//! CSV input and output.
//!
//! # Formats
//!
//! | File | Columns |
//! |------|---------|
//! | Groups | `id`, 10 preference columns, `size` |
//! | Assignments | `group_id`, `assigned_slot` |
//!
//! Every file starts with a header row that is skipped on read; column
//! names are not enforced. Errors carry the 1-based line of the record.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Group, GroupId, Instance, ModelError, SlotId, Solution, PREFERENCE_COUNT};

/// Columns in a group record.
pub const GROUP_COLUMNS: usize = PREFERENCE_COUNT + 2;

/// Errors raised while reading or writing CSV files.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Line {line}: {source}")]
    Record { line: u64, source: csv::Error },
    #[error("Line {line}: expected {expected} columns, found {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("Line {line}: {source}")]
    InvalidGroup { line: u64, source: ModelError },
    #[error("Line {line}: group {group} assigned twice")]
    DuplicateAssignment { line: u64, group: GroupId },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// One row of an assignment file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub group_id: GroupId,
    pub assigned_slot: SlotId,
}

/// Reads groups from CSV.
///
/// # Example
/// ```
/// use u_assign::io::read_groups;
///
/// let data = "family_id,choice_0,choice_1,choice_2,choice_3,choice_4,\
/// choice_5,choice_6,choice_7,choice_8,choice_9,n_people\n\
/// 0,52,38,12,82,33,75,64,76,10,28,4\n";
/// let instance = read_groups(data.as_bytes()).unwrap();
/// assert_eq!(instance.len(), 1);
/// assert_eq!(instance.group(0).rank(38), Some(1));
/// assert_eq!(instance.group(0).size(), 4);
/// ```
pub fn read_groups<R: Read>(reader: R) -> Result<Instance, IoError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut groups = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|source| IoError::Record {
            line: line_of_error(&source),
            source,
        })?;
        let line = record.position().map_or(0, |p| p.line());

        if record.len() != GROUP_COLUMNS {
            return Err(IoError::FieldCount {
                line,
                expected: GROUP_COLUMNS,
                found: record.len(),
            });
        }

        let values: Vec<u32> = record
            .deserialize(None)
            .map_err(|source| IoError::Record { line, source })?;
        let preferences = values[1..=PREFERENCE_COUNT].to_vec();
        let group = Group::new(values[0], preferences, values[PREFERENCE_COUNT + 1])
            .map_err(|source| IoError::InvalidGroup { line, source })?;
        groups.push(group);
    }

    debug!(groups = groups.len(), "Read group records");
    Ok(Instance::new(groups)?)
}

/// Reads groups from a CSV file.
pub fn read_groups_from_path(path: impl AsRef<Path>) -> Result<Instance, IoError> {
    let path = path.as_ref();
    let instance = read_groups(File::open(path)?)?;
    info!(path = %path.display(), groups = instance.len(), "Loaded groups");
    Ok(instance)
}

/// Reads a group ID → slot mapping from CSV.
pub fn read_assignments<R: Read>(reader: R) -> Result<BTreeMap<GroupId, SlotId>, IoError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut assignments = BTreeMap::new();
    for result in rdr.records() {
        let record = result.map_err(|source| IoError::Record {
            line: line_of_error(&source),
            source,
        })?;
        let line = record.position().map_or(0, |p| p.line());
        let (group, slot): (GroupId, SlotId) = record
            .deserialize(None)
            .map_err(|source| IoError::Record { line, source })?;

        if assignments.insert(group, slot).is_some() {
            return Err(IoError::DuplicateAssignment { line, group });
        }
    }
    Ok(assignments)
}

/// Reads an assignment file.
pub fn read_assignments_from_path(
    path: impl AsRef<Path>,
) -> Result<BTreeMap<GroupId, SlotId>, IoError> {
    let path = path.as_ref();
    let assignments = read_assignments(File::open(path)?)?;
    info!(path = %path.display(), assignments = assignments.len(), "Loaded assignments");
    Ok(assignments)
}

/// Writes the assigned groups of a solution, sorted by group ID.
pub fn write_assignments<W: Write>(writer: W, solution: &Solution) -> Result<(), IoError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let assignments = solution.assignments();

    if assignments.is_empty() {
        wtr.write_record(["group_id", "assigned_slot"])?;
    }
    for (group_id, assigned_slot) in assignments {
        wtr.serialize(AssignmentRecord {
            group_id,
            assigned_slot,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes an assignment file.
pub fn write_assignments_to_path(path: impl AsRef<Path>, solution: &Solution) -> Result<(), IoError> {
    let path = path.as_ref();
    write_assignments(File::create(path)?, solution)?;
    info!(path = %path.display(), "Wrote assignments");
    Ok(())
}

fn line_of_error(err: &csv::Error) -> u64 {
    err.position().map_or(0, |p| p.line())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotRange;

    const HEADER: &str = "family_id,choice_0,choice_1,choice_2,choice_3,choice_4,\
choice_5,choice_6,choice_7,choice_8,choice_9,n_people\n";

    #[test]
    fn test_read_groups() {
        let data = format!(
            "{HEADER}0,52,38,12,82,33,75,64,76,10,28,4\n1,26,4,82,5,11,47,38,6,66,61,4\n"
        );
        let instance = read_groups(data.as_bytes()).unwrap();
        assert_eq!(instance.len(), 2);
        assert_eq!(instance.group(1).id(), 1);
        assert_eq!(instance.group(1).preferences()[0], 26);
        assert_eq!(instance.group(1).rank(61), Some(9));
        assert_eq!(instance.eligible_for(82), &[0, 1]);
    }

    #[test]
    fn test_read_groups_reports_line() {
        let data = format!("{HEADER}0,52,38,12,82,33,75,64,76,10,28,4\n1,26,4,82,x,11,47,38,6,66,61,4\n");
        match read_groups(data.as_bytes()).unwrap_err() {
            IoError::Record { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_groups_wrong_column_count() {
        let data = format!("{HEADER}0,52,38,4\n");
        match read_groups(data.as_bytes()).unwrap_err() {
            IoError::FieldCount {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 12);
                assert_eq!(found, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_groups_rejects_invalid_group() {
        let data = format!("{HEADER}0,1,1,2,3,4,5,6,7,8,9,4\n");
        assert!(matches!(
            read_groups(data.as_bytes()),
            Err(IoError::InvalidGroup {
                line: 2,
                source: ModelError::DuplicatePreference { group: 0, slot: 1 }
            })
        ));

        let data = format!("{HEADER}0,1,2,3,4,5,6,7,8,9,10,4\n0,1,2,3,4,5,6,7,8,9,10,2\n");
        assert!(matches!(
            read_groups(data.as_bytes()),
            Err(IoError::Model(ModelError::DuplicateGroupId(0)))
        ));
    }

    #[test]
    fn test_write_assignments_sorted_with_header() {
        let data = format!("{HEADER}7,1,2,3,4,5,6,7,8,9,10,3\n2,2,1,3,4,5,6,7,8,9,10,4\n");
        let instance = read_groups(data.as_bytes()).unwrap();
        let mut solution = Solution::empty(&instance, SlotRange::new(1, 10).unwrap());
        solution.assign(0, 1).unwrap();
        solution.assign(1, 2).unwrap();

        let mut out = Vec::new();
        write_assignments(&mut out, &solution).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "group_id,assigned_slot\n2,2\n7,1\n");

        let back = read_assignments(text.as_bytes()).unwrap();
        assert_eq!(back, solution.assignments());
    }

    #[test]
    fn test_write_empty_solution_keeps_header() {
        let data = format!("{HEADER}7,1,2,3,4,5,6,7,8,9,10,3\n");
        let instance = read_groups(data.as_bytes()).unwrap();
        let solution = Solution::empty(&instance, SlotRange::new(1, 10).unwrap());

        let mut out = Vec::new();
        write_assignments(&mut out, &solution).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "group_id,assigned_slot\n");
    }

    #[test]
    fn test_read_assignments_errors() {
        let dup = "family_id,assigned_day\n1,5\n1,6\n";
        assert!(matches!(
            read_assignments(dup.as_bytes()),
            Err(IoError::DuplicateAssignment { line: 3, group: 1 })
        ));

        let bad = "family_id,assigned_day\n1,five\n";
        assert!(matches!(
            read_assignments(bad.as_bytes()),
            Err(IoError::Record { line: 2, .. })
        ));
    }
}
