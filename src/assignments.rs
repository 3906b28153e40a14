// Assignment CSV input. Each row is `section,room,period` with no header.
// Rows are grouped by section; every section is later sent as a single
// request carrying all of its `period,room` pairs.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const COLUMNS: usize = 3;

/// One CSV row. Field order matches the column order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Assignment {
    pub section: String,
    pub room: String,
    pub period: String,
}

/// `(period, room)`
pub type Block = (String, String);

/// Rows grouped by section id. Iterates sections in ascending id order.
#[derive(Debug, Default, Clone)]
pub struct SectionAssignments {
    by_section: BTreeMap<String, Vec<Block>>,
    rows: usize,
}

impl SectionAssignments {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("Failed to read assignments from {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut grouped = SectionAssignments::default();
        for (index, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("Malformed CSV near row {}", index + 1))?;
            let line = record.position().map_or(index as u64 + 1, |pos| pos.line());
            if record.len() != COLUMNS {
                bail!(
                    "line {}: expected {} columns (section, room, period), found {}",
                    line,
                    COLUMNS,
                    record.len()
                );
            }
            let assignment: Assignment = record
                .deserialize(None)
                .with_context(|| format!("line {}: unreadable row", line))?;
            grouped.push(assignment);
        }
        Ok(grouped)
    }

    pub fn push(&mut self, assignment: Assignment) {
        self.by_section
            .entry(assignment.section)
            .or_default()
            .push((assignment.period, assignment.room));
        self.rows += 1;
    }

    pub fn section_count(&self) -> usize {
        self.by_section.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Sections in id order, each with its blocks sorted by period then room.
    pub fn into_sorted(self) -> Vec<(String, Vec<Block>)> {
        self.by_section
            .into_iter()
            .map(|(section, mut blocks)| {
                blocks.sort();
                (section, blocks)
            })
            .collect()
    }
}

/// Request body value: one `period,room` per line.
pub fn block_room_assignments(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|(period, room)| format!("{},{}", period, room))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(period: &str, room: &str) -> Block {
        (period.to_string(), room.to_string())
    }

    #[test]
    fn groups_rows_by_section_and_sorts_blocks() {
        let csv = "12,Room B,3\n7,Room A,1\n12,Room A,2\n12,Room A,1\n";
        let grouped = SectionAssignments::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(grouped.row_count(), 4);
        assert_eq!(grouped.section_count(), 2);
        assert_eq!(
            grouped.into_sorted(),
            vec![
                (
                    "12".to_string(),
                    vec![block("1", "Room A"), block("2", "Room A"), block("3", "Room B")]
                ),
                ("7".to_string(), vec![block("1", "Room A")]),
            ]
        );
    }

    #[test]
    fn ties_on_period_are_broken_by_room() {
        let csv = "5,20-100,9\n5,10-250,9\n";
        let sorted = SectionAssignments::from_reader(csv.as_bytes()).unwrap().into_sorted();
        assert_eq!(sorted[0].1, vec![block("9", "10-250"), block("9", "20-100")]);
    }

    #[test]
    fn wrong_column_count_names_the_line() {
        let csv = "1,2,3\n4,5\n";
        let err = SectionAssignments::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
        assert!(err.to_string().contains("found 2"), "{}", err);
    }

    #[test]
    fn empty_input_has_no_sections() {
        let grouped = SectionAssignments::from_reader("".as_bytes()).unwrap();
        assert_eq!(grouped.section_count(), 0);
        assert!(grouped.into_sorted().is_empty());
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let csv = "3,\"Lobby, east\",4\n";
        let sorted = SectionAssignments::from_reader(csv.as_bytes()).unwrap().into_sorted();
        assert_eq!(sorted, vec![("3".to_string(), vec![block("4", "Lobby, east")])]);
    }

    #[test]
    fn block_room_assignments_joins_with_newlines() {
        let blocks = vec![block("1", "A"), block("2", "B")];
        assert_eq!(block_room_assignments(&blocks), "1,A\n2,B");
        assert_eq!(block_room_assignments(&[]), "");
    }
}
