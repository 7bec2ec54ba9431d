//! Loading merge inputs from disk.
//!
//! Each input becomes a [`LineSequence`]: the file's lines plus the display
//! path written after its conflict marker. Line endings (`\n` or `\r\n`)
//! are stripped and a trailing newline does not produce an empty last line.
//! Bytes that are not valid UTF-8 are decoded lossily.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MergeError, MergeResult};
use crate::hunk::MergeLabels;

/// An immutable, ordered list of lines read from one merge input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineSequence {
    label: String,
    lines: Vec<String>,
}

impl LineSequence {
    pub fn new(label: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            label: label.into(),
            lines,
        }
    }

    /// Split `text` into lines.
    pub fn from_text(label: impl Into<String>, text: &str) -> Self {
        Self::new(label, text.lines().map(str::to_owned).collect())
    }

    /// Read the file at `path`. The label is its display path.
    pub fn load(path: impl AsRef<Path>) -> MergeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MergeError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path).map_err(|source| MergeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        let sequence = Self::from_text(display_path(path), &text);
        debug!(path = %sequence.label, lines = sequence.len(), "loaded merge input");
        Ok(sequence)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The three loaded inputs of a merge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeInputs {
    pub older: LineSequence,
    pub mine: LineSequence,
    pub yours: LineSequence,
}

impl MergeInputs {
    pub fn labels(&self) -> MergeLabels {
        MergeLabels::new(self.older.label(), self.mine.label(), self.yours.label())
    }
}

/// Load all three inputs, failing on the first missing or unreadable one.
pub fn load_inputs(
    older: impl AsRef<Path>,
    mine: impl AsRef<Path>,
    yours: impl AsRef<Path>,
) -> MergeResult<MergeInputs> {
    Ok(MergeInputs {
        older: LineSequence::load(older)?,
        mine: LineSequence::load(mine)?,
        yours: LineSequence::load(yours)?,
    })
}

/// The path shown in conflict markers: relative to the current directory
/// when the file lies below it, with `/` separators.
pub fn display_path(path: &Path) -> String {
    let resolved = resolve(path);
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| std::fs::canonicalize(cwd).ok())
        .and_then(|cwd| resolved.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(resolved);
    relative.to_string_lossy().replace('\\', "/")
}

fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_strips_line_endings() {
        let seq = LineSequence::from_text("t", "a\r\nb\nc\n");
        assert_eq!(seq.lines(), ["a", "b", "c"]);
    }

    #[test]
    fn from_text_without_trailing_newline() {
        let seq = LineSequence::from_text("t", "a\n\nb");
        assert_eq!(seq.lines(), ["a", "", "b"]);
    }

    #[test]
    fn empty_text_is_empty_sequence() {
        let seq = LineSequence::from_text("t", "");
        assert!(seq.is_empty());
        assert_eq!(seq.len(), 0);
    }

    #[test]
    fn load_reads_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.txt");
        std::fs::write(&path, "one\ntwo\n").unwrap();

        let seq = LineSequence::load(&path).unwrap();
        assert_eq!(seq.lines(), ["one", "two"]);
        assert!(seq.label().ends_with("base.txt"));
        assert!(!seq.label().contains('\\'));
    }

    #[test]
    fn load_missing_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        match LineSequence::load(&path) {
            Err(MergeError::InputNotFound { path: p }) => assert_eq!(p, path),
            other => panic!("expected InputNotFound, got {other:?}"),
        }
    }

    #[test]
    fn load_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LineSequence::load(dir.path()).unwrap_err();
        assert!(matches!(err, MergeError::Io { .. }));
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.txt");
        std::fs::write(&path, b"ok\n\xff\xfe\n").unwrap();

        let seq = LineSequence::load(&path).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.lines()[0], "ok");
        assert!(seq.lines()[1].contains('\u{FFFD}'));
    }

    #[test]
    fn load_inputs_stops_at_first_missing() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base");
        std::fs::write(&base, "a\n").unwrap();
        let err = load_inputs(&base, dir.path().join("mine"), &base).unwrap_err();
        match err {
            MergeError::InputNotFound { path } => assert!(path.ends_with("mine")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn load_inputs_labels() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["o", "m", "y"] {
            std::fs::write(dir.path().join(name), "x\n").unwrap();
        }
        let inputs =
            load_inputs(dir.path().join("o"), dir.path().join("m"), dir.path().join("y")).unwrap();
        let labels = inputs.labels();
        assert!(labels.older.ends_with("/o"));
        assert!(labels.mine.ends_with("/m"));
        assert!(labels.yours.ends_with("/y"));
    }

    #[test]
    fn display_path_is_relative_to_cwd() {
        // Tests run with the crate root as working directory.
        assert_eq!(display_path(Path::new("Cargo.toml")), "Cargo.toml");
        assert_eq!(display_path(Path::new("./src/lib.rs")), "src/lib.rs");
    }

    #[test]
    fn display_path_of_missing_file_is_unchanged() {
        assert_eq!(display_path(Path::new("no/such/file.txt")), "no/such/file.txt");
    }
}
