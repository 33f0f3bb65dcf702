//! File name heuristics for test code.

/// Source extensions considered when matching test file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileClassifier {
    /// Extensions without the leading dot (e.g. `java`).
    extensions: Vec<String>,
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self::new(["java"])
    }
}

impl FileClassifier {
    /// Create a classifier for the given source extensions.
    ///
    /// Leading dots are stripped, so `".java"` and `"java"` are equivalent.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_string())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    /// Configured extensions.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Path ends with `test.<ext>` or `Test.<ext>`.
    pub fn is_canonical_test_file(&self, path: &str) -> bool {
        self.extensions.iter().any(|ext| {
            path.strip_suffix(ext.as_str())
                .and_then(|rest| rest.strip_suffix('.'))
                .is_some_and(|stem| stem.ends_with("test") || stem.ends_with("Test"))
        })
    }

    /// Basename starts with `test` or `Test` and the path has a source extension.
    pub fn is_test_named_file(&self, path: &str) -> bool {
        let name = basename(path);
        (name.starts_with("test") || name.starts_with("Test")) && self.has_source_extension(path)
    }

    /// Path ends with `.<ext>` for a configured extension.
    pub fn has_source_extension(&self, path: &str) -> bool {
        self.extensions.iter().any(|ext| {
            path.strip_suffix(ext.as_str())
                .is_some_and(|rest| rest.ends_with('.'))
        })
    }
}

/// Final `/`-separated segment of a path (the whole path if there is no separator).
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
