//! Recursive include expansion.
//!
//! Replaces every include directive with the fully expanded content of the
//! referenced file, producing a single flattened document for converters
//! that cannot follow includes. Missing targets degrade to an inline
//! diagnostic comment plus a warning; include cycles are detected and
//! reported instead of recursing forever.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::dialect::{Dialect, IncludeResolution};
use crate::error::{BindError, Result};

/// Recursive include expander for one base directory and dialect.
///
/// Directives are replaced in a single left-to-right pass; replacement text
/// is never re-scanned at the same level, so only the recursive descent into
/// an included file's own content drives nesting. With
/// [`IncludeResolution::Root`] (the default) every directive resolves
/// against the expander's base directory, no matter how deeply nested the
/// including file is.
pub struct Expander<'a> {
    base_dir: PathBuf,
    dialect: &'a Dialect,
    pattern: Regex,
}

impl<'a> Expander<'a> {
    /// Create an expander resolving includes against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>, dialect: &'a Dialect) -> Self {
        Self {
            base_dir: base_dir.into(),
            pattern: dialect.include_regex(),
            dialect,
        }
    }

    /// Expand all include directives in `text`.
    ///
    /// Total for missing files (diagnostic comment substituted); fails only
    /// for unreadable-but-existing files ([`BindError::IncludeRead`]) or an
    /// include cycle ([`BindError::CyclicInclude`]).
    pub fn expand(&self, text: &str) -> Result<String> {
        let mut in_progress: Vec<PathBuf> = Vec::new();
        self.expand_in(text, &self.base_dir, &mut in_progress)
    }

    fn expand_in(
        &self,
        text: &str,
        dir: &Path,
        in_progress: &mut Vec<PathBuf>,
    ) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in self.pattern.captures_iter(text) {
            // Groups 0 and 1 are guaranteed to exist when the regex matches
            let (Some(m), Some(arg)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&text[last..m.start()]);
            out.push_str(&self.replace_directive(arg.as_str(), dir, in_progress)?);
            last = m.end();
        }

        out.push_str(&text[last..]);
        Ok(out)
    }

    /// Produce the replacement text for a single directive.
    fn replace_directive(
        &self,
        arg: &str,
        dir: &Path,
        in_progress: &mut Vec<PathBuf>,
    ) -> Result<String> {
        let normalized = self.dialect.normalized_include(arg);
        let path = dir.join(&normalized);

        if !path.is_file() {
            tracing::warn!(path = %path.display(), "Include file not found");
            return Ok(self.dialect.missing_include_comment(arg));
        }

        // Key cycle tracking by the canonical path so the same file reached
        // through different spellings is still caught.
        let key = path.canonicalize().unwrap_or_else(|_| path.clone());
        if in_progress.contains(&key) {
            let mut chain = in_progress.clone();
            chain.push(key);
            return Err(BindError::CyclicInclude { chain });
        }

        let content = fs::read_to_string(&path).map_err(|source| BindError::IncludeRead {
            path: path.clone(),
            source,
        })?;

        let next_dir = match self.dialect.include_resolution {
            IncludeResolution::Root => self.base_dir.clone(),
            IncludeResolution::IncludingFile => path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dir.to_path_buf()),
        };

        in_progress.push(key);
        let expanded = self.expand_in(&content, &next_dir, in_progress)?;
        in_progress.pop();

        Ok(expanded)
    }
}
