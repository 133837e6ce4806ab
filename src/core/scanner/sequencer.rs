//! Groups sibling files into captures and numbers them in capture order.

use super::SourceFile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Files sharing a base name, plus the sequence number they all receive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureGroup {
    /// Six-digit, zero-padded, 1-based position in capture order
    pub sequence: String,
    /// Base name shared by every member
    pub base_name: String,
    /// Earliest modification time among the members
    pub earliest_modified: SystemTime,
    /// Member files, ordered by file name
    pub files: Vec<SourceFile>,
}

/// Render a 1-based counter as a sequence string (`7` -> `"000007"`).
pub fn format_sequence(counter: usize) -> String {
    format!("{:06}", counter)
}

/// Group files by base name and number the groups in capture order.
///
/// Groups are ordered by their earliest member's modification time;
/// ties fall back to the base name so the result is deterministic.
pub fn group_captures(files: Vec<SourceFile>) -> Vec<CaptureGroup> {
    let mut by_base: BTreeMap<String, Vec<SourceFile>> = BTreeMap::new();
    for file in files {
        by_base.entry(file.base_name.clone()).or_default().push(file);
    }

    let mut groups: Vec<(String, SystemTime, Vec<SourceFile>)> = by_base
        .into_iter()
        .map(|(base_name, mut members)| {
            members.sort_by(|a, b| a.file_name.cmp(&b.file_name));
            let earliest = members
                .iter()
                .map(|f| f.modified)
                .min()
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (base_name, earliest, members)
        })
        .collect();

    groups.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    groups
        .into_iter()
        .enumerate()
        .map(|(i, (base_name, earliest_modified, files))| CaptureGroup {
            sequence: format_sequence(i + 1),
            base_name,
            earliest_modified,
            files,
        })
        .collect()
}
