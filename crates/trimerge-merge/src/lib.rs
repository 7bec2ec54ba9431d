//! Three-way line merge.
//!
//! Merges two derived versions of a text ("mine" and "yours") against their
//! common ancestor ("older") in a single forward pass, resynchronizing the
//! three inputs by bounded lookahead and emitting diff3-style conflict
//! blocks where both sides changed the same region differently.
//!
//! # Key Types
//!
//! - [`ThreeWayMerger`] -- the merge pass, see [`merger`] for the algorithm
//! - [`MergeConfig`] -- lookahead window and keep-older-on-delete policies
//! - [`Block`] / [`Resolution`] -- one divergent block and how it was resolved
//! - [`MergeOutcome`] / [`MergeStats`] -- merged lines plus counters
//! - [`LineSequence`] -- an input loaded from disk, labelled with its display path

pub mod config;
pub mod error;
pub mod hunk;
pub mod merger;
pub mod outcome;
pub mod source;

pub use config::{MergeConfig, DEFAULT_LOOKAHEAD_WINDOW};
pub use error::{MergeError, MergeResult};
pub use hunk::{Block, MergeLabels, Resolution, Side};
pub use merger::{merge_lines, ThreeWayMerger};
pub use outcome::{MergeOutcome, MergeStats};
pub use source::{display_path, load_inputs, LineSequence, MergeInputs};
