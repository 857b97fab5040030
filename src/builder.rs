//! Pipeline orchestration: structure regeneration, include expansion, and
//! output writing.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::dialect::Dialect;
use crate::error::{BindError, Result};
use crate::expand::Expander;
use crate::structure::{render_structure, scan_content_root, splice_structure, Part};

/// Expand all includes in `input` and return the flattened text.
///
/// Includes resolve against the input file's directory.
pub fn expand_document(input: &Path, dialect: &Dialect) -> Result<String> {
    if !input.is_file() {
        return Err(BindError::InputNotFound(input.to_path_buf()));
    }
    let content = fs::read_to_string(input)?;
    let base_dir = input.parent().unwrap_or(Path::new(""));
    Expander::new(base_dir, dialect).expand(&content)
}

/// Expand `input` into `output`, or to stdout when `output` is `None`.
pub fn expand_file(input: &Path, output: Option<&Path>, dialect: &Dialect) -> Result<()> {
    match output {
        Some(path) => {
            let expanded = expand_document(input, dialect)?;
            write_output(path, &expanded)
        }
        None => expand_to_writer(input, &mut io::stdout().lock(), dialect),
    }
}

/// Expand `input` and stream the flattened text to `writer`.
pub fn expand_to_writer(input: &Path, writer: &mut impl Write, dialect: &Dialect) -> Result<()> {
    let expanded = expand_document(input, dialect)?;
    writer.write_all(expanded.as_bytes())?;
    Ok(())
}

/// Rescan the content root and rewrite the structure section of `shell_doc`
/// in place.
///
/// Returns the scanned parts so callers can report what was found. An empty
/// scan is [`BindError::NoContent`]: regenerating a book with no chapters is
/// treated as a mistake, not a request for an empty structure section.
pub fn regenerate_structure(
    shell_doc: &Path,
    content_root: &Path,
    dialect: &Dialect,
) -> Result<Vec<Part>> {
    if !shell_doc.is_file() {
        return Err(BindError::InputNotFound(shell_doc.to_path_buf()));
    }

    let parts = scan_content_root(content_root, dialect)?;
    if parts.is_empty() {
        return Err(BindError::NoContent(content_root.to_path_buf()));
    }

    let prefix = include_prefix(shell_doc, content_root);
    let section = render_structure(&parts, &prefix, dialect);

    let original = fs::read_to_string(shell_doc)?;
    let updated = splice_structure(&original, &section, dialect)?;
    write_output(shell_doc, &updated)?;

    Ok(parts)
}

/// Regenerate the structure section, then expand the shell document into a
/// single flattened file at `output`.
pub fn build_document(
    shell_doc: &Path,
    content_root: &Path,
    output: &Path,
    dialect: &Dialect,
) -> Result<Vec<Part>> {
    let parts = regenerate_structure(shell_doc, content_root, dialect)?;
    expand_file(shell_doc, Some(output), dialect)?;
    Ok(parts)
}

/// Content root path as referenced from the shell document's directory.
///
/// Falls back to the content root as given when it is not located under the
/// shell document's directory; include resolution then still works because
/// joining an absolute path replaces the base.
fn include_prefix(shell_doc: &Path, content_root: &Path) -> String {
    let base = shell_doc.parent().unwrap_or(Path::new(""));
    let rel = content_root.strip_prefix(base).unwrap_or(content_root);
    rel.to_string_lossy().replace('\\', "/")
}

/// Write `content` to `path`, creating parent directories as needed.
///
/// Uses the atomic write pattern: write to a temp file, sync, then rename,
/// so a crash cannot leave a half-written document behind.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_expand_document_missing_input() {
        let err = expand_document(Path::new("/nonexistent/book.tex"), &Dialect::latex());
        assert!(matches!(err, Err(BindError::InputNotFound(_))));
    }

    #[test]
    fn test_expand_file_writes_output() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("src/book.tex"), "top\n\\input{chap}\n");
        write(&dir.path().join("src/chap.tex"), "chapter\n");

        let output = dir.path().join("build/out.tex");
        expand_file(
            &dir.path().join("src/book.tex"),
            Some(&output),
            &Dialect::latex(),
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "top\nchapter\n\n");
        // No temp file left behind
        assert!(!dir.path().join("build/.out.tex.tmp").exists());
    }

    #[test]
    fn test_expand_to_writer_streams_flattened_text() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("book.tex"), "top\n\\input{chap}\n");
        write(&dir.path().join("chap.tex"), "chapter\n");

        let mut buf: Vec<u8> = Vec::new();
        expand_to_writer(&dir.path().join("book.tex"), &mut buf, &Dialect::latex()).unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "top\nchapter\n\n");
    }

    #[test]
    fn test_expand_to_writer_missing_input() {
        let mut buf: Vec<u8> = Vec::new();
        let err = expand_to_writer(
            Path::new("/nonexistent/book.tex"),
            &mut buf,
            &Dialect::latex(),
        );
        assert!(matches!(err, Err(BindError::InputNotFound(_))));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_write_output_overwrites_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.tex");
        write_output(&path, "first").unwrap();
        write_output(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_regenerate_structure_rewrites_in_place() {
        let dir = tempdir().unwrap();
        let shell = dir.path().join("src/book.tex");
        write(
            &shell,
            "\\begin{document}\n\\tableofcontents\nstale\n\\end{document}\n",
        );
        write(&dir.path().join("src/ideas/partA/chap1.tex"), "one");

        let parts =
            regenerate_structure(&shell, &dir.path().join("src/ideas"), &Dialect::latex())
                .unwrap();
        assert_eq!(parts.len(), 1);

        let updated = fs::read_to_string(&shell).unwrap();
        assert!(updated.contains("\\part{partA}"));
        assert!(updated.contains("\\input{ideas/partA/chap1}"));
        assert!(!updated.contains("stale"));
    }

    #[test]
    fn test_regenerate_structure_is_idempotent() {
        let dir = tempdir().unwrap();
        let shell = dir.path().join("src/book.tex");
        write(
            &shell,
            "\\begin{document}\n\\tableofcontents\nold\n\\end{document}\n",
        );
        write(&dir.path().join("src/ideas/partA/chap1.tex"), "one");

        let root = dir.path().join("src/ideas");
        regenerate_structure(&shell, &root, &Dialect::latex()).unwrap();
        let first = fs::read_to_string(&shell).unwrap();
        regenerate_structure(&shell, &root, &Dialect::latex()).unwrap();
        let second = fs::read_to_string(&shell).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_regenerate_structure_empty_root_is_no_content() {
        let dir = tempdir().unwrap();
        let shell = dir.path().join("book.tex");
        write(&shell, "\\tableofcontents\n\\end{document}\n");
        let root = dir.path().join("ideas");
        fs::create_dir(&root).unwrap();

        let err = regenerate_structure(&shell, &root, &Dialect::latex());
        assert!(matches!(err, Err(BindError::NoContent(_))));
    }

    #[test]
    fn test_include_prefix_relative_to_shell_dir() {
        assert_eq!(
            include_prefix(Path::new("src/book.tex"), Path::new("src/ideas")),
            "ideas"
        );
        // Content root elsewhere: used as given
        assert_eq!(
            include_prefix(Path::new("src/book.tex"), Path::new("other/ideas")),
            "other/ideas"
        );
    }
}
