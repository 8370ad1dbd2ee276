//! Interactive parameter collection.
//!
//! A thin adapter that asks for every request parameter in turn and produces a
//! [`RedactionRequest`]. It never touches a document. End of input at any
//! prompt cancels the whole collection.

use crate::domain::{default_output_path, FillColor, MatchMode, RedactionRequest, TermMatcher};
use crate::error::{RedactorError, RedactorResult};
use crate::report::Styling;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Prompts over any line-oriented input and output.
pub struct Prompter<R, W> {
    input: R,
    out: W,
    style: Styling,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, out: W, style: Styling) -> Self {
        Self { input, out, style }
    }

    /// Asks for every parameter and builds the request.
    pub fn collect_request(&mut self) -> RedactorResult<RedactionRequest> {
        self.say(&self.style.paint("1", "=== PDF Redaction Tool ==="))?;
        self.say("")?;

        let input = self.ask_input_path()?;
        let use_regex =
            self.ask_yes_no("\nTreat terms as regular expressions? (y/n, default: n): ", false)?;
        let mode = if use_regex {
            MatchMode::Regex
        } else {
            MatchMode::Literal
        };
        let terms = self.ask_terms(mode)?;
        let case_sensitive =
            self.ask_yes_no("\nCase sensitive search? (y/n, default: y): ", true)?;
        let fill_color = self.ask_color()?;
        let output = self.ask_output_path(&input)?;

        let mut request = RedactionRequest::new(input, terms)?
            .with_regex(use_regex)
            .with_case_sensitive(case_sensitive)
            .with_fill_color(fill_color);
        if let Some(output) = output {
            request = request.with_output(output);
        }
        Ok(request)
    }

    fn ask_input_path(&mut self) -> RedactorResult<PathBuf> {
        loop {
            let answer = self.ask("Enter the path to the PDF file: ")?;
            let path = expand_path(&answer);
            if path.is_file() {
                return Ok(path);
            }
            self.say(&format!(
                "Error: File '{}' not found. Please try again.\n",
                path.display()
            ))?;
        }
    }

    fn ask_terms(&mut self, mode: MatchMode) -> RedactorResult<Vec<String>> {
        self.say("\nEnter text to redact (you can add multiple terms):")?;
        self.say("Type each term and press Enter. When done, press Enter on an empty line.")?;

        let mut terms: Vec<String> = Vec::new();
        loop {
            let term = self.ask(&format!(
                "Term #{} (or press Enter to finish): ",
                terms.len() + 1
            ))?;

            if term.is_empty() {
                if !terms.is_empty() {
                    return Ok(terms);
                }
                self.say("You must enter at least one term to redact.")?;
                continue;
            }

            if mode == MatchMode::Regex {
                if let Err(e) = TermMatcher::compile(&term, mode, true) {
                    self.say(&format!("{}. Please try again.", e))?;
                    continue;
                }
            }

            terms.push(term);
        }
    }

    fn ask_color(&mut self) -> RedactorResult<FillColor> {
        self.say("\nChoose redaction color:")?;
        self.say("1. Black (default)")?;
        self.say("2. White")?;
        self.say("3. Custom RGB")?;

        match self.ask("Enter choice (1-3): ")?.as_str() {
            "2" => Ok(FillColor::WHITE),
            "3" => {
                let mut rgb = [0.0f32; 3];
                for (slot, name) in rgb.iter_mut().zip(["Red", "Green", "Blue"]) {
                    match self.ask(&format!("{} (0-1): ", name))?.parse::<f32>() {
                        Ok(value) => *slot = value,
                        Err(_) => return self.fall_back_to_black("Invalid RGB values"),
                    }
                }
                match FillColor::new(rgb[0], rgb[1], rgb[2]) {
                    Ok(color) => Ok(color),
                    Err(e) => self.fall_back_to_black(&e.to_string()),
                }
            }
            _ => Ok(FillColor::BLACK),
        }
    }

    fn fall_back_to_black(&mut self, reason: &str) -> RedactorResult<FillColor> {
        let line = self
            .style
            .paint("33", &format!("Warning: {}. Using black.", reason));
        self.say(&line)?;
        Ok(FillColor::BLACK)
    }

    fn ask_output_path(&mut self, input: &Path) -> RedactorResult<Option<PathBuf>> {
        self.say(&format!(
            "\nOutput path (press Enter for default: {})",
            default_output_path(input).display()
        ))?;
        let answer = self.ask("Output path: ")?;
        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(expand_path(&answer)))
        }
    }

    fn ask_yes_no(&mut self, question: &str, default: bool) -> RedactorResult<bool> {
        let answer = self.ask(question)?.to_lowercase();
        Ok(match answer.as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }

    /// Prints a prompt and reads one trimmed line.
    fn ask(&mut self, prompt: &str) -> RedactorResult<String> {
        write!(self.out, "{}", prompt).map_err(terminal_error)?;
        self.out.flush().map_err(terminal_error)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(terminal_error)?;
        if read == 0 {
            return Err(RedactorError::Cancelled);
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, line: &str) -> RedactorResult<()> {
        writeln!(self.out, "{}", line).map_err(terminal_error)
    }
}

fn terminal_error(source: io::Error) -> RedactorError {
    RedactorError::Io {
        path: PathBuf::from("<terminal>"),
        source,
    }
}

/// Expands `~`, `$VAR` and `${VAR}` and strips surrounding quotes.
///
/// Unknown variables are left untouched.
pub fn expand_path(raw: &str) -> PathBuf {
    static ENV_VAR: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
            .expect("Valid env var regex")
    });

    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(trimmed);

    let expanded = ENV_VAR
        .replace_all(unquoted, |caps: &Captures| {
            let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned();

    if let Some(rest) = expanded.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') {
            if let Some(home) = std::env::var_os("HOME") {
                return PathBuf::from(home).join(rest.trim_start_matches('/'));
            }
        }
    }

    PathBuf::from(expanded)
}
