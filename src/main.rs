//! PDF Redaction CLI Application.
//!
//! Redacts literal terms or regex matches from a PDF given on the command line,
//! or asks for every parameter interactively when started without arguments.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pdf_redact::prompt::Prompter;
use pdf_redact::report::json_outcome;
use pdf_redact::{FillColor, RedactionRequest, RedactionService, RedactorError, Reporter, Styling};

/// PDF Redaction Tool
///
/// Permanently removes text from PDF documents and writes a sanitized copy.
/// Run without arguments for interactive mode.
#[derive(Parser)]
#[command(name = "pdf-redact")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Input PDF file path
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Terms to redact (literal text, or patterns with --regex)
    #[arg(value_name = "TERMS")]
    terms: Vec<String>,

    /// Output PDF file path (default: <input>_redacted.pdf next to the input)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Case-insensitive search
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Fill color: black, white, or R,G,B with components between 0 and 1
    #[arg(short, long, value_name = "COLOR", default_value = "black")]
    color: String,

    /// Interpret terms as regular expressions
    #[arg(short, long)]
    regex: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a PDF (for debugging and verification)
    Extract {
        /// Input PDF file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output text file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Redaction command handler.
struct RedactionHandler {
    service: RedactionService,
    style: Styling,
    verbose: bool,
    json: bool,
}

impl RedactionHandler {
    fn new(style: Styling, verbose: bool, json: bool) -> Self {
        Self {
            service: RedactionService::with_mupdf(),
            style,
            verbose,
            json,
        }
    }

    /// Executes a redaction request and reports the outcome.
    fn redact(&self, request: &RedactionRequest) -> Result<()> {
        if self.json {
            let outcome = self.service.redact(request);
            println!("{}", serde_json::to_string_pretty(&json_outcome(&outcome))?);
            outcome.context("Redaction failed")?;
            return Ok(());
        }

        if self.verbose {
            println!("Input:  {}", request.input().display());
            println!("Output: {}", request.output_path().display());
            println!(
                "Terms:  {} ({:?}, case {})",
                request.terms().len(),
                request.mode(),
                if request.case_sensitive() {
                    "sensitive"
                } else {
                    "insensitive"
                }
            );
            println!("Color:  {}", request.fill_color());
        }

        let mut reporter = Reporter::new(io::stdout(), self.style);
        reporter.header("Starting Redaction")?;

        let result = self
            .service
            .redact_with_progress(request, |progress| {
                // A closed stdout must not abort a redaction halfway
                let _ = reporter.page_progress(progress);
            })
            .context("Redaction failed")?;

        reporter.summary(&result)?;
        if !result.has_redactions() {
            reporter.warning("No instances found to redact")?;
        }
        reporter.success("Redaction completed successfully!")?;

        Ok(())
    }

    /// Collects parameters interactively, then redacts.
    fn interactive(&self) -> Result<()> {
        let request = {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout(), self.style);
            prompter.collect_request()
        };

        match request {
            Ok(request) => self.redact(&request),
            Err(RedactorError::Cancelled) => {
                println!("\n\nOperation cancelled.");
                Err(RedactorError::Cancelled.into())
            }
            Err(e) => Err(e).context("Failed to collect parameters"),
        }
    }

    /// Extracts text from a PDF.
    fn extract(&self, input: &Path, output: Option<&Path>) -> Result<()> {
        let pages = self
            .service
            .extract_text(input)
            .with_context(|| "Text extraction failed")?;

        let mut text = String::new();
        for (index, page) in pages.iter().enumerate() {
            text.push_str(&format!("--- Page {} ---\n", index + 1));
            text.push_str(page);
            if !page.ends_with('\n') {
                text.push('\n');
            }
        }

        if let Some(output_path) = output {
            std::fs::write(output_path, &text)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!(
                "✓ Extracted {} page(s) → {}",
                pages.len(),
                output_path.display()
            );
        } else {
            print!("{}", text);
        }

        Ok(())
    }
}

/// Parses the color flag, falling back to black with a warning.
fn resolve_color<W: Write>(value: &str, reporter: &mut Reporter<W>) -> FillColor {
    match value.parse::<FillColor>() {
        Ok(color) => color,
        Err(e) => {
            let _ = reporter.warning(&format!("{}. Using black.", e));
            FillColor::BLACK
        }
    }
}

/// Builds a redaction request from command-line arguments.
fn build_request<W: Write>(
    cli: &Cli,
    input: &Path,
    reporter: &mut Reporter<W>,
) -> Result<RedactionRequest> {
    let fill_color = resolve_color(&cli.color, reporter);

    let mut request = RedactionRequest::new(input, cli.terms.iter().cloned())
        .context("Invalid redaction request")?
        .with_case_sensitive(!cli.ignore_case)
        .with_regex(cli.regex)
        .with_fill_color(fill_color);

    if let Some(output) = &cli.output {
        request = request.with_output(output);
    }

    Ok(request)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "pdf_redact=debug"
    } else {
        "pdf_redact=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: &Cli, style: Styling) -> Result<()> {
    let handler = RedactionHandler::new(style, cli.verbose, cli.json);

    match (&cli.command, &cli.input) {
        (Some(Commands::Extract { input, output }), _) => {
            handler.extract(input, output.as_deref())
        }
        (None, Some(input)) => {
            let mut warnings = Reporter::new(io::stderr(), style);
            let request = build_request(cli, input, &mut warnings)?;
            handler.redact(&request)
        }
        (None, None) => handler.interactive(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let style = Styling::detect();

    match run(&cli, style) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let mut reporter = Reporter::new(io::stderr(), style);
            let _ = reporter.failure(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
