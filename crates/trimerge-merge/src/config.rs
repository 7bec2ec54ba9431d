use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, MergeResult};

/// Default number of lines searched ahead for a resynchronization point.
pub const DEFAULT_LOOKAHEAD_WINDOW: usize = 100;

/// Configuration for a three-way merge.
///
/// The raw `keep_older_*` flags are combined by
/// [`should_keep_older_on_mine_delete`] and
/// [`should_keep_older_on_yours_delete`]; the merger only consults those.
///
/// [`should_keep_older_on_mine_delete`]: MergeConfig::should_keep_older_on_mine_delete
/// [`should_keep_older_on_yours_delete`]: MergeConfig::should_keep_older_on_yours_delete
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    /// Maximum distance searched ahead in each input for a line all three agree on.
    pub lookahead_window: usize,
    /// Keep the older lines when mine deletes a hunk that yours leaves untouched.
    pub keep_older_on_mine_delete: bool,
    /// Keep the older lines when yours deletes a hunk that mine leaves untouched.
    pub keep_older_on_yours_delete: bool,
    /// Shorthand for enabling both of the above.
    pub keep_older_on_either_delete: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            lookahead_window: DEFAULT_LOOKAHEAD_WINDOW,
            keep_older_on_mine_delete: false,
            keep_older_on_yours_delete: false,
            keep_older_on_either_delete: false,
        }
    }
}

impl MergeConfig {
    /// Set the lookahead window.
    pub fn with_lookahead_window(mut self, window: usize) -> Self {
        self.lookahead_window = window;
        self
    }

    /// Keep older lines when mine deletes them.
    pub fn keep_older_on_mine_delete(mut self, keep: bool) -> Self {
        self.keep_older_on_mine_delete = keep;
        self
    }

    /// Keep older lines when yours deletes them.
    pub fn keep_older_on_yours_delete(mut self, keep: bool) -> Self {
        self.keep_older_on_yours_delete = keep;
        self
    }

    /// Keep older lines when either side deletes them.
    pub fn keep_older_on_either_delete(mut self, keep: bool) -> Self {
        self.keep_older_on_either_delete = keep;
        self
    }

    pub fn should_keep_older_on_mine_delete(&self) -> bool {
        self.keep_older_on_mine_delete || self.keep_older_on_either_delete
    }

    pub fn should_keep_older_on_yours_delete(&self) -> bool {
        self.keep_older_on_yours_delete || self.keep_older_on_either_delete
    }

    /// The same configuration with the mine and yours roles exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            lookahead_window: self.lookahead_window,
            keep_older_on_mine_delete: self.keep_older_on_yours_delete,
            keep_older_on_yours_delete: self.keep_older_on_mine_delete,
            keep_older_on_either_delete: self.keep_older_on_either_delete,
        }
    }

    /// Parse a TOML configuration. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> MergeResult<Self> {
        toml::from_str(text).map_err(|e| MergeError::Config(e.to_string()))
    }

    /// Load a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> MergeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MergeError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| MergeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = MergeConfig::default();
        assert_eq!(c.lookahead_window, 100);
        assert!(!c.should_keep_older_on_mine_delete());
        assert!(!c.should_keep_older_on_yours_delete());
    }

    #[test]
    fn either_flag_enables_both_sides() {
        let c = MergeConfig::default().keep_older_on_either_delete(true);
        assert!(c.should_keep_older_on_mine_delete());
        assert!(c.should_keep_older_on_yours_delete());
    }

    #[test]
    fn per_side_flags_are_independent() {
        let c = MergeConfig::default().keep_older_on_mine_delete(true);
        assert!(c.should_keep_older_on_mine_delete());
        assert!(!c.should_keep_older_on_yours_delete());
    }

    #[test]
    fn swapped_exchanges_side_flags() {
        let c = MergeConfig::default()
            .with_lookahead_window(7)
            .keep_older_on_mine_delete(true)
            .swapped();
        assert_eq!(c.lookahead_window, 7);
        assert!(!c.keep_older_on_mine_delete);
        assert!(c.keep_older_on_yours_delete);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let c = MergeConfig::from_toml_str("keep_older_on_yours_delete = true\n").unwrap();
        assert_eq!(c.lookahead_window, DEFAULT_LOOKAHEAD_WINDOW);
        assert!(c.keep_older_on_yours_delete);
        assert!(!c.keep_older_on_mine_delete);
    }

    #[test]
    fn full_toml() {
        let text = r#"
lookahead_window = 12
keep_older_on_mine_delete = true
keep_older_on_yours_delete = false
keep_older_on_either_delete = false
"#;
        let c = MergeConfig::from_toml_str(text).unwrap();
        assert_eq!(c.lookahead_window, 12);
        assert!(c.should_keep_older_on_mine_delete());
    }

    #[test]
    fn unknown_key_rejected() {
        let err = MergeConfig::from_toml_str("window = 3\n").unwrap_err();
        assert!(matches!(err, MergeError::Config(_)));
    }

    #[test]
    fn wrong_type_rejected() {
        let err = MergeConfig::from_toml_str("lookahead_window = \"big\"\n").unwrap_err();
        assert!(matches!(err, MergeError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trimerge.toml");
        std::fs::write(&path, "lookahead_window = 5\n").unwrap();
        let c = MergeConfig::load(&path).unwrap();
        assert_eq!(c.lookahead_window, 5);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MergeConfig::load(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, MergeError::InputNotFound { .. }));
    }
}
