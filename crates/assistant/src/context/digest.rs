//! Case-file digest: the notes attached to uploaded case files, flattened
//! into one context block.

use serde::{Deserialize, Serialize};

/// Notes a caregiver attached to one uploaded case file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFileNote {
    /// File name or label as shown to the caregiver
    pub name: String,
    /// Free-text notes about the file's contents
    pub notes: String,
}

impl CaseFileNote {
    pub fn new(name: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notes: notes.into(),
        }
    }
}

/// One `- name: notes` line per file with non-blank notes, in input order.
///
/// Returns `None` when no file carries notes.
pub fn digest_case_files(files: &[CaseFileNote]) -> Option<String> {
    let lines: Vec<String> = files
        .iter()
        .filter(|f| !f.notes.trim().is_empty())
        .map(|f| {
            let notes = f.notes.split_whitespace().collect::<Vec<_>>().join(" ");
            format!("- {}: {}", f.name.trim(), notes)
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
