use std::io::Write;

use serde::Serialize;

use crate::hunk::{Resolution, Side};

/// Counters collected during one merge pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Lines copied by the common-prefix fast path.
    pub common_lines: usize,
    /// Divergent blocks where neither side changed anything.
    pub unchanged_blocks: usize,
    /// Blocks taken from mine.
    pub mine_blocks: usize,
    /// Blocks taken from yours.
    pub yours_blocks: usize,
    /// Deletions by mine that the keep-older policy undid.
    pub kept_older_on_mine_delete: usize,
    /// Deletions by yours that the keep-older policy undid.
    pub kept_older_on_yours_delete: usize,
    /// Blocks both sides changed identically.
    pub convergent_blocks: usize,
    /// Conflict blocks emitted.
    pub conflicts: usize,
    /// Whether the last block was the remainder left after the lookahead search failed.
    pub unsynchronized_tail: bool,
}

impl MergeStats {
    pub(crate) fn record(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Unchanged => self.unchanged_blocks += 1,
            Resolution::TookMine => self.mine_blocks += 1,
            Resolution::TookYours => self.yours_blocks += 1,
            Resolution::KeptOlder {
                deleted_by: Side::Mine,
            } => self.kept_older_on_mine_delete += 1,
            Resolution::KeptOlder {
                deleted_by: Side::Yours,
            } => self.kept_older_on_yours_delete += 1,
            Resolution::Convergent => self.convergent_blocks += 1,
            Resolution::Conflict => self.conflicts += 1,
        }
    }

    /// Total number of divergent blocks classified.
    pub fn blocks(&self) -> usize {
        self.unchanged_blocks
            + self.mine_blocks
            + self.yours_blocks
            + self.kept_older_on_mine_delete
            + self.kept_older_on_yours_delete
            + self.convergent_blocks
            + self.conflicts
    }
}

/// The merged line sequence together with statistics about how it was built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub lines: Vec<String>,
    pub stats: MergeStats,
}

impl MergeOutcome {
    /// Returns `true` if any conflict block was emitted.
    pub fn has_conflicts(&self) -> bool {
        self.stats.conflicts > 0
    }

    pub fn conflict_count(&self) -> usize {
        self.stats.conflicts
    }

    /// The merged text, every line terminated by `\n`.
    pub fn to_text(&self) -> String {
        let capacity = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut text = String::with_capacity(capacity);
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    /// Write the merged text to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for line in &self.lines {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}
