//! texbind - Assemble multi-part LaTeX books.
//!
//! This crate implements a small document-build pipeline for a book written
//! in a markup language with include directives (LaTeX by default). It does
//! two things:
//!
//! 1. Derives the book's part/chapter structure from a two-level content
//!    directory (`root/{part}/{chapter}.tex`) and splices it into a shell
//!    document between fixed anchors.
//! 2. Recursively inlines every `\input{...}` directive so a downstream
//!    converter that cannot follow includes (pandoc) can process a single
//!    flattened file.
//!
//! # Example
//!
//! ```
//! use texbind::{splice_structure, Dialect};
//!
//! let dialect = Dialect::latex();
//! let shell = "\\begin{document}\n\\tableofcontents\nold\n\\end{document}\n";
//! let updated = splice_structure(shell, "\\part{New}", &dialect).unwrap();
//! assert!(updated.contains("\\part{New}"));
//! assert!(!updated.contains("old"));
//! ```
//!
//! # Architecture
//!
//! - [`dialect`]: markup dialect configuration (extension, directive
//!   keyword, anchors)
//! - [`error`]: error types and Result alias
//! - [`structure`]: content tree scanning, structure rendering, anchor
//!   splicing
//! - [`expand`]: recursive include expansion with cycle detection
//! - [`builder`]: pipeline orchestration and output writing
//! - [`cli`]: command-line interface

pub mod builder;
pub mod cli;
pub mod dialect;
pub mod error;
pub mod expand;
pub mod structure;

// Re-export main functions
pub use builder::{
    build_document, expand_document, expand_file, expand_to_writer, regenerate_structure,
};

// Re-export commonly used items
pub use dialect::{Dialect, IncludeResolution};
pub use error::{BindError, Result};
pub use expand::Expander;
pub use structure::{render_structure, scan_content_root, splice_structure, Part};
