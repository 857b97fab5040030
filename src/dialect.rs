//! Markup dialect configuration.
//!
//! All markup-specific strings (chapter file extension, include directive
//! keyword, structural commands, splice anchors) live in a [`Dialect`] value
//! passed explicitly into the structure generator and the include expander,
//! so tests and users can substitute alternate dialects. The default dialect
//! reproduces LaTeX conventions: `.tex` chapters, `\input{...}` includes,
//! `\part`/`\chapter` structure and `\tableofcontents`/`\end{document}`
//! anchors.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{BindError, Result};

/// How include arguments inside included files are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncludeResolution {
    /// Resolve every include against the top-level base directory,
    /// regardless of nesting depth. This matches LaTeX `\input` semantics
    /// and is the default.
    #[default]
    Root,

    /// Resolve includes against the directory of the file that contains
    /// them, the way C-style `#include "..."` works.
    IncludingFile,
}

/// Markup dialect: every fixed string the pipeline recognizes or emits.
///
/// Deserializable from YAML so a `--config` file can override individual
/// fields; anything omitted falls back to the LaTeX defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Dialect {
    /// Chapter file extension, without the leading dot.
    pub extension: String,

    /// Include directive command name (the part after the backslash).
    pub include_keyword: String,

    /// Command emitted for each part.
    pub part_command: String,

    /// Command emitted for each chapter.
    pub chapter_command: String,

    /// Anchor after which the generated structure section is spliced.
    pub structure_anchor: String,

    /// Anchor marking the end of the replaceable structure section.
    pub end_anchor: String,

    /// Comment prefix used for missing-include diagnostics.
    pub comment_prefix: String,

    /// How nested includes are resolved during expansion.
    pub include_resolution: IncludeResolution,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::latex()
    }
}

impl Dialect {
    /// The built-in LaTeX dialect.
    #[must_use]
    pub fn latex() -> Self {
        Self {
            extension: "tex".to_string(),
            include_keyword: "input".to_string(),
            part_command: "part".to_string(),
            chapter_command: "chapter".to_string(),
            structure_anchor: "\\tableofcontents".to_string(),
            end_anchor: "\\end{document}".to_string(),
            comment_prefix: "%".to_string(),
            include_resolution: IncludeResolution::Root,
        }
    }

    /// Load a dialect from a YAML file.
    ///
    /// Fields omitted in the file keep their LaTeX defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(BindError::InputNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml_ng::from_str(&content)?)
    }

    /// Regex matching one include directive.
    ///
    /// The argument is the literal text between the first `{` and the first
    /// `}` after the keyword; paths containing a literal `}` are therefore
    /// not supported.
    #[allow(clippy::expect_used)] // Escaped keyword always yields a valid pattern
    #[must_use]
    pub fn include_regex(&self) -> Regex {
        Regex::new(&format!(
            r"\\{}\{{([^}}]+)\}}",
            regex::escape(&self.include_keyword)
        ))
        .expect("valid regex")
    }

    /// Append the dialect's extension to an include argument that lacks it.
    ///
    /// # Examples
    /// ```
    /// use texbind::Dialect;
    ///
    /// let dialect = Dialect::latex();
    /// assert_eq!(dialect.normalized_include("intro"), "intro.tex");
    /// assert_eq!(dialect.normalized_include("intro.tex"), "intro.tex");
    /// ```
    #[must_use]
    pub fn normalized_include(&self, name: &str) -> String {
        let suffix = format!(".{}", self.extension);
        if name.ends_with(&suffix) {
            name.to_string()
        } else {
            format!("{name}{suffix}")
        }
    }

    /// One-line diagnostic comment substituted for a missing include.
    ///
    /// Carries the name exactly as written in the directive so the broken
    /// reference is searchable in the source tree.
    #[must_use]
    pub fn missing_include_comment(&self, name: &str) -> String {
        format!("{} File not found: {}", self.comment_prefix, name)
    }
}
