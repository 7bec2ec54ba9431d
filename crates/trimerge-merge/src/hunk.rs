//! Divergent blocks and their classification.
//!
//! A [`Block`] holds the three hunks cut from older, mine, and yours between
//! the current cursors and the next resynchronization point. [`Block::classify`]
//! applies the keep-older policies and decides what the merge emits.

use serde::Serialize;

use crate::config::MergeConfig;

pub const MARKER_OLDER: &str = "<<<<<<<";
pub const MARKER_MINE: &str = "|||||||";
pub const MARKER_SEPARATOR: &str = "=======";
pub const MARKER_YOURS: &str = ">>>>>>>";

/// One of the two derived branches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Mine,
    Yours,
}

/// Display names written after the conflict markers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MergeLabels {
    pub older: String,
    pub mine: String,
    pub yours: String,
}

impl Default for MergeLabels {
    fn default() -> Self {
        Self::new("older", "mine", "yours")
    }
}

impl MergeLabels {
    pub fn new(
        older: impl Into<String>,
        mine: impl Into<String>,
        yours: impl Into<String>,
    ) -> Self {
        Self {
            older: older.into(),
            mine: mine.into(),
            yours: yours.into(),
        }
    }
}

/// How a divergent block was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Resolution {
    /// Neither side changed the block.
    Unchanged,
    /// Only mine changed it.
    TookMine,
    /// Only yours changed it.
    TookYours,
    /// One side deleted the block and the keep-older policy restored it.
    KeptOlder { deleted_by: Side },
    /// Both sides made the identical change.
    Convergent,
    /// Both sides changed it differently.
    Conflict,
}

/// The three hunks of one divergent block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block<'a> {
    pub older: &'a [String],
    pub mine: &'a [String],
    pub yours: &'a [String],
}

impl<'a> Block<'a> {
    pub fn new(older: &'a [String], mine: &'a [String], yours: &'a [String]) -> Self {
        Self { older, mine, yours }
    }

    /// Decide how this block merges. Slice equality is ordered and
    /// length-sensitive, so hunks of different lengths never match.
    pub fn classify(&self, config: &MergeConfig) -> Resolution {
        let mine_unchanged = self.mine == self.older;
        let yours_unchanged = self.yours == self.older;

        match (mine_unchanged, yours_unchanged) {
            (true, true) => Resolution::Unchanged,
            (false, true) => {
                if config.should_keep_older_on_mine_delete() && self.is_deletion(self.mine) {
                    Resolution::KeptOlder {
                        deleted_by: Side::Mine,
                    }
                } else {
                    Resolution::TookMine
                }
            }
            (true, false) => {
                if config.should_keep_older_on_yours_delete() && self.is_deletion(self.yours) {
                    Resolution::KeptOlder {
                        deleted_by: Side::Yours,
                    }
                } else {
                    Resolution::TookYours
                }
            }
            (false, false) if self.mine == self.yours => Resolution::Convergent,
            (false, false) => Resolution::Conflict,
        }
    }

    fn is_deletion(&self, side: &[String]) -> bool {
        side.is_empty() && !self.older.is_empty()
    }

    /// Append the lines chosen by `resolution` to `out`.
    pub fn emit(&self, resolution: Resolution, labels: &MergeLabels, out: &mut Vec<String>) {
        match resolution {
            Resolution::Unchanged | Resolution::KeptOlder { .. } => {
                out.extend_from_slice(self.older)
            }
            Resolution::TookMine | Resolution::Convergent => out.extend_from_slice(self.mine),
            Resolution::TookYours => out.extend_from_slice(self.yours),
            Resolution::Conflict => self.emit_conflict(labels, out),
        }
    }

    fn emit_conflict(&self, labels: &MergeLabels, out: &mut Vec<String>) {
        out.reserve(self.older.len() + self.mine.len() + self.yours.len() + 4);
        out.push(format!("{MARKER_OLDER} {}", labels.older));
        out.extend_from_slice(self.older);
        out.push(format!("{MARKER_MINE} {}", labels.mine));
        out.extend_from_slice(self.mine);
        out.push(MARKER_SEPARATOR.to_string());
        out.extend_from_slice(self.yours);
        out.push(format!("{MARKER_YOURS} {}", labels.yours));
    }
}
