//! Structure generation: derive the part/chapter layout from a content tree
//! and splice it into the shell document.
//!
//! The content root has a two-level layout, `root/{part}/{chapter}.<ext>`:
//! each immediate subdirectory is a part and each chapter file inside it a
//! chapter. Parts and chapters are ordered ascending by name, and a part
//! without any chapter files is dropped entirely.

use std::fs;
use std::path::{Path, PathBuf};

use crate::dialect::Dialect;
use crate::error::{BindError, Result};

/// One part of the book: a content subdirectory and its chapter file stems,
/// in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub chapters: Vec<String>,
}

/// Scan the content root and return the ordered part/chapter structure.
///
/// Fails with [`BindError::ContentRootNotFound`] if `root` is missing or not
/// a directory. An empty result is not an error; callers decide whether
/// "nothing to render" is acceptable.
pub fn scan_content_root(root: &Path, dialect: &Dialect) -> Result<Vec<Part>> {
    if !root.is_dir() {
        return Err(BindError::ContentRootNotFound(root.to_path_buf()));
    }

    let mut part_dirs: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            part_dirs.push((entry.file_name().to_string_lossy().into_owned(), path));
        }
    }
    part_dirs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut parts = Vec::new();
    for (name, dir) in part_dirs {
        // Sort by file name, then strip the extension, so ordering matches
        // a plain directory listing.
        let mut files: Vec<String> = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(dialect.extension.as_str())
            {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort();

        let chapters: Vec<String> = files
            .iter()
            .map(|f| {
                Path::new(f)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| f.clone())
            })
            .collect();

        if !chapters.is_empty() {
            parts.push(Part { name, chapters });
        }
    }

    Ok(parts)
}

/// Render the structure section for the shell document.
///
/// For each part: a part command, then per chapter a chapter command and an
/// include directive pointing at `{prefix}/{part}/{chapter}`, then a blank
/// line. `include_prefix` is the content root as referenced from the shell
/// document's directory (e.g. `ideas`); pass `""` if the parts live directly
/// next to the shell document.
#[must_use]
pub fn render_structure(parts: &[Part], include_prefix: &str, dialect: &Dialect) -> String {
    let prefix = include_prefix.trim_end_matches('/');
    let mut lines: Vec<String> = Vec::new();

    for part in parts {
        lines.push(format!("\\{}{{{}}}", dialect.part_command, part.name));
        for chapter in &part.chapters {
            lines.push(format!("\\{}{{{}}}", dialect.chapter_command, chapter));
            let target = if prefix.is_empty() {
                format!("{}/{}", part.name, chapter)
            } else {
                format!("{}/{}/{}", prefix, part.name, chapter)
            };
            lines.push(format!("\\{}{{{}}}", dialect.include_keyword, target));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Replace everything between the structure anchor and the end anchor of
/// `document` with `section`.
///
/// The first occurrence of each anchor wins; the end anchor is searched only
/// after the structure anchor, and everything from it onward is preserved
/// verbatim. Behavior with multiple end anchors beyond the first is
/// undefined. Fails with [`BindError::AnchorNotFound`] if either anchor is
/// absent.
pub fn splice_structure(document: &str, section: &str, dialect: &Dialect) -> Result<String> {
    let start = document
        .find(&dialect.structure_anchor)
        .ok_or_else(|| BindError::AnchorNotFound(dialect.structure_anchor.clone()))?;
    let header_end = start + dialect.structure_anchor.len();

    let rest = &document[header_end..];
    let end_offset = rest
        .find(&dialect.end_anchor)
        .ok_or_else(|| BindError::AnchorNotFound(dialect.end_anchor.clone()))?;

    let header = &document[..header_end];
    let footer = &rest[end_offset..];
    let section = section.trim_end();

    Ok(format!("{header}\n\n{section}\n\n{footer}"))
}
