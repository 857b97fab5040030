//! Command-line interface for the book builder.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::builder::{build_document, expand_file, regenerate_structure};
use crate::dialect::{Dialect, IncludeResolution};
use crate::error::Result;
use crate::structure::Part;

/// texbind - Assemble multi-part LaTeX books from a content tree.
#[derive(Parser)]
#[command(name = "texbind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Dialect configuration file (YAML); defaults to the built-in LaTeX dialect
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// How nested includes are resolved
    #[arg(long, global = true, value_enum)]
    pub resolve_includes: Option<ResolveMode>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI spelling of [`IncludeResolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResolveMode {
    /// Against the input document's directory (LaTeX behavior)
    Root,
    /// Against the directory of the including file
    IncludingFile,
}

impl From<ResolveMode> for IncludeResolution {
    fn from(mode: ResolveMode) -> Self {
        match mode {
            ResolveMode::Root => IncludeResolution::Root,
            ResolveMode::IncludingFile => IncludeResolution::IncludingFile,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Flatten all include directives into a single document.
    Expand {
        /// Input document
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Regenerate the structure section of a shell document from the content tree.
    Structure {
        /// Shell document to rewrite in place
        shell_doc: PathBuf,

        /// Content root directory containing part subdirectories
        #[arg(short = 'r', long)]
        content_root: PathBuf,
    },

    /// Regenerate structure, then flatten includes into a single output file.
    Build {
        /// Shell document (structure section is rewritten in place)
        shell_doc: PathBuf,

        /// Content root directory containing part subdirectories
        #[arg(short = 'r', long)]
        content_root: PathBuf,

        /// Output file for the flattened document
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut dialect = match &cli.config {
        Some(path) => Dialect::from_yaml_file(path)?,
        None => Dialect::latex(),
    };
    if let Some(mode) = cli.resolve_includes {
        dialect.include_resolution = mode.into();
    }

    match cli.command {
        Commands::Expand { input, output } => expand_command(&input, output.as_deref(), &dialect),
        Commands::Structure {
            shell_doc,
            content_root,
        } => structure_command(&shell_doc, &content_root, &dialect),
        Commands::Build {
            shell_doc,
            content_root,
            output,
        } => build_command(&shell_doc, &content_root, &output, &dialect),
    }
}

/// Execute the expand command.
fn expand_command(
    input: &std::path::Path,
    output: Option<&std::path::Path>,
    dialect: &Dialect,
) -> Result<()> {
    expand_file(input, output, dialect)?;

    // Keep stdout clean when it carries the document itself
    if let Some(path) = output {
        println!(
            "{} {}",
            style("Expanded to:").green().bold(),
            path.display()
        );
    }

    Ok(())
}

/// Execute the structure command.
fn structure_command(
    shell_doc: &std::path::Path,
    content_root: &std::path::Path,
    dialect: &Dialect,
) -> Result<()> {
    println!(
        "{} {}",
        style("Scanning").bold(),
        style(content_root.display()).cyan()
    );

    let parts = regenerate_structure(shell_doc, content_root, dialect)?;
    print_parts(&parts);

    println!();
    println!(
        "{} {}",
        style("Structure updated in:").green().bold(),
        shell_doc.display()
    );

    Ok(())
}

/// Execute the build command.
fn build_command(
    shell_doc: &std::path::Path,
    content_root: &std::path::Path,
    output: &std::path::Path,
    dialect: &Dialect,
) -> Result<()> {
    println!(
        "{} {} from {}",
        style("Building").bold(),
        style(shell_doc.display()).cyan(),
        style(content_root.display()).cyan()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message("Regenerating structure and expanding includes...");

    let parts = match build_document(shell_doc, content_root, output, dialect) {
        Ok(parts) => parts,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_and_clear();

    print_parts(&parts);
    println!();
    println!(
        "{} {}",
        style("Flattened document written to:").green().bold(),
        output.display()
    );

    Ok(())
}

fn print_parts(parts: &[Part]) {
    for part in parts {
        println!(
            "  {} ({} chapters)",
            style(&part.name).cyan(),
            part.chapters.len()
        );
    }
}
