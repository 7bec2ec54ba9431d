//! The three-way merge pass.
//!
//! The merge walks older, mine, and yours in one forward pass:
//!
//! 1. Lines equal in all three inputs are copied once.
//! 2. At the first divergence, the search looks up to `lookahead_window`
//!    lines ahead in older for a line that also occurs within the window in
//!    both mine and yours. The nearest such line in older wins.
//! 3. The hunks before that point are classified (see [`Block::classify`])
//!    and the chosen lines, or a conflict block, are emitted.
//! 4. If no such line exists, everything left in the three inputs forms
//!    the final block.
//!
//! # Resynchronization is heuristic
//!
//! Matching takes the *first* occurrence within the window, not a
//! longest-common-subsequence alignment. Inputs with repeated lines can
//! therefore resynchronize on a structurally wrong line and produce larger
//! or different conflict blocks than a full diff3 would.

use tracing::{debug, info};

use crate::config::MergeConfig;
use crate::hunk::{Block, MergeLabels, Resolution};
use crate::outcome::{MergeOutcome, MergeStats};
use crate::source::{LineSequence, MergeInputs};

/// Merges three line sequences against their common ancestor.
///
/// A merger holds only configuration and labels; every call to
/// [`merge`](ThreeWayMerger::merge) owns its own cursor state, so one merger
/// can serve many merges, including concurrent ones.
#[derive(Clone, Debug, Default)]
pub struct ThreeWayMerger {
    config: MergeConfig,
    labels: MergeLabels,
}

impl ThreeWayMerger {
    pub fn new(config: MergeConfig) -> Self {
        Self {
            config,
            labels: MergeLabels::default(),
        }
    }

    /// Use `labels` in conflict markers.
    pub fn with_labels(mut self, labels: MergeLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    pub fn labels(&self) -> &MergeLabels {
        &self.labels
    }

    /// Merge `mine` and `yours` against `older`.
    pub fn merge(&self, older: &[String], mine: &[String], yours: &[String]) -> MergeOutcome {
        self.merge_labelled(older, mine, yours, &self.labels)
    }

    /// Merge loaded sequences, labelling conflict markers with their display paths.
    pub fn merge_sequences(
        &self,
        older: &LineSequence,
        mine: &LineSequence,
        yours: &LineSequence,
    ) -> MergeOutcome {
        let labels = MergeLabels::new(older.label(), mine.label(), yours.label());
        self.merge_labelled(older.lines(), mine.lines(), yours.lines(), &labels)
    }

    /// Merge the output of [`load_inputs`](crate::source::load_inputs).
    pub fn merge_inputs(&self, inputs: &MergeInputs) -> MergeOutcome {
        self.merge_sequences(&inputs.older, &inputs.mine, &inputs.yours)
    }

    fn merge_labelled(
        &self,
        older: &[String],
        mine: &[String],
        yours: &[String],
        labels: &MergeLabels,
    ) -> MergeOutcome {
        let mut state = MergeState::new(older, mine, yours);
        state.run(&self.config, labels);
        let outcome = state.finish();
        info!(
            lines = outcome.lines.len(),
            blocks = outcome.stats.blocks(),
            conflicts = outcome.stats.conflicts,
            "merge complete"
        );
        outcome
    }
}

/// Merge with default labels (`older`, `mine`, `yours`).
pub fn merge_lines(
    older: &[String],
    mine: &[String],
    yours: &[String],
    config: &MergeConfig,
) -> MergeOutcome {
    ThreeWayMerger::new(config.clone()).merge(older, mine, yours)
}

/// Indices into older, mine, and yours at which all three agree again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SyncPoint {
    older: usize,
    mine: usize,
    yours: usize,
}

/// Cursor state for a single merge pass. Cursors only move forward.
struct MergeState<'a> {
    older: &'a [String],
    mine: &'a [String],
    yours: &'a [String],
    b: usize,
    m: usize,
    t: usize,
    out: Vec<String>,
    stats: MergeStats,
}

impl<'a> MergeState<'a> {
    fn new(older: &'a [String], mine: &'a [String], yours: &'a [String]) -> Self {
        Self {
            older,
            mine,
            yours,
            b: 0,
            m: 0,
            t: 0,
            out: Vec::with_capacity(older.len().max(mine.len()).max(yours.len())),
            stats: MergeStats::default(),
        }
    }

    fn run(&mut self, config: &MergeConfig, labels: &MergeLabels) {
        loop {
            self.copy_common();
            if self.at_end() {
                return;
            }
            match self.find_sync_point(config.lookahead_window) {
                Some(sync) => {
                    debug!(
                        older = sync.older,
                        mine = sync.mine,
                        yours = sync.yours,
                        "resynchronized"
                    );
                    self.take_block(sync, config, labels);
                }
                None => {
                    debug!(
                        older = self.b,
                        mine = self.m,
                        yours = self.t,
                        "no resynchronization point; merging remainder"
                    );
                    let end = SyncPoint {
                        older: self.older.len(),
                        mine: self.mine.len(),
                        yours: self.yours.len(),
                    };
                    self.stats.unsynchronized_tail = true;
                    self.take_block(end, config, labels);
                    return;
                }
            }
        }
    }

    /// Copy lines equal in all three inputs.
    fn copy_common(&mut self) {
        while self.b < self.older.len()
            && self.m < self.mine.len()
            && self.t < self.yours.len()
            && self.older[self.b] == self.mine[self.m]
            && self.older[self.b] == self.yours[self.t]
        {
            self.out.push(self.older[self.b].clone());
            self.stats.common_lines += 1;
            self.b += 1;
            self.m += 1;
            self.t += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.b == self.older.len() && self.m == self.mine.len() && self.t == self.yours.len()
    }

    /// The nearest line in older, within the window, that also occurs within
    /// the window in both mine and yours.
    fn find_sync_point(&self, window: usize) -> Option<SyncPoint> {
        let older_end = self.older.len().min(self.b.saturating_add(window));
        (self.b..older_end).find_map(|b| {
            let line = &self.older[b];
            let m = find_within(self.mine, self.m, window, line)?;
            let t = find_within(self.yours, self.t, window, line)?;
            Some(SyncPoint {
                older: b,
                mine: m,
                yours: t,
            })
        })
    }

    /// Classify and emit the block up to `sync`, then move the cursors there.
    fn take_block(&mut self, sync: SyncPoint, config: &MergeConfig, labels: &MergeLabels) {
        let block = Block::new(
            &self.older[self.b..sync.older],
            &self.mine[self.m..sync.mine],
            &self.yours[self.t..sync.yours],
        );
        let resolution = block.classify(config);
        debug!(
            ?resolution,
            older = block.older.len(),
            mine = block.mine.len(),
            yours = block.yours.len(),
            "classified block"
        );
        block.emit(resolution, labels, &mut self.out);
        self.stats.record(resolution);
        if resolution == Resolution::Conflict {
            debug!(line = self.out.len(), "conflict emitted");
        }
        self.b = sync.older;
        self.m = sync.mine;
        self.t = sync.yours;
    }

    fn finish(self) -> MergeOutcome {
        MergeOutcome {
            lines: self.out,
            stats: self.stats,
        }
    }
}

/// Index of the first `line` in `seq[from..from + window]`, clamped to the end.
fn find_within(seq: &[String], from: usize, window: usize, line: &str) -> Option<usize> {
    let end = seq.len().min(from.saturating_add(window));
    seq.get(from..end)?
        .iter()
        .position(|candidate| candidate == line)
        .map(|offset| from + offset)
}
