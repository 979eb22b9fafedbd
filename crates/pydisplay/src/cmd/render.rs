//! Implementation of the pydisplay-render command.

use crate::notebook;
use anyhow::{Context, Result};
use clap::Parser;
use pydisplay_dom::{Display, DisplayConfig, DisplayOptions, ElementOptions, MemoryDocument};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, Level};

/// Render notebook or display_data output to an HTML fragment.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The notebook or output JSON file (`-` for stdin)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Id of the element outputs are written into
    #[arg(short, long, default_value = "output")]
    pub target: String,

    /// Replace the target's content instead of appending one wrapper per output
    #[arg(long)]
    pub replace: bool,

    /// Tag of the wrapper element created per output
    #[arg(long, default_value = "div")]
    pub wrapper_tag: String,

    /// Class added to every wrapper element (repeatable)
    #[arg(long = "wrapper-class", value_name = "CLASS")]
    pub wrapper_classes: Vec<String>,

    /// Keep outputs that render to nothing
    #[arg(long)]
    pub keep_empty: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    fn config(&self) -> DisplayConfig {
        let options = self
            .wrapper_classes
            .iter()
            .fold(ElementOptions::new(), |options, class| {
                options.with_class(class.as_str())
            });
        let config = DisplayConfig {
            wrapper_tag: self.wrapper_tag.clone(),
            ..DisplayConfig::with_wrapper_options(options)
        };
        if self.keep_empty {
            config.keep_degenerate()
        } else {
            config
        }
    }
}

fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        return Ok(source);
    }
    if !file.exists() {
        anyhow::bail!("file not found: {}", file.display());
    }
    fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

/// Render the outputs of `source` into a fresh document and return the
/// target element's HTML.
pub fn render_source(source: &str, args: &Args) -> Result<String> {
    let outputs = notebook::load(source).context("failed to load outputs")?;

    let id = args.target.strip_prefix('#').unwrap_or(&args.target);
    if id.is_empty() {
        anyhow::bail!("--target cannot be empty");
    }

    let doc = MemoryDocument::new();
    let root = doc.add_element(doc.body(), "div", id);
    let display = Display::with_config(&doc, args.config());
    let options = DisplayOptions::new().target(id).append(!args.replace);

    for (index, output) in outputs.iter().enumerate() {
        display
            .display_one(output, &options)
            .with_context(|| format!("failed to display output {index}"))?;
    }
    debug!(outputs = outputs.len(), "rendered");

    for warning in doc.warnings() {
        eprintln!("warning: {warning}");
    }

    let mut html = doc.outer_html(root);
    html.push('\n');
    Ok(html)
}

fn run(args: &Args) -> Result<ExitCode> {
    let source = read_input(&args.file)?;
    let html = render_source(&source, args)?;

    if let Some(ref output_path) = args.output {
        fs::write(output_path, &html)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        if args.verbose {
            eprintln!("Rendered {} -> {}", args.file.display(), output_path.display());
        }
    } else {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(html.as_bytes())
            .context("failed to write to stdout")?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Main entry point for the render command.
pub fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(io::stderr)
            .init();
    }

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
