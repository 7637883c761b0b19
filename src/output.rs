//! Terminal output and file placement for the muzovano CLI.
//!
//! Status lines are Cargo-style with right-aligned coloured verbs, written
//! to stderr; stdout is reserved for machine-readable output.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use crate::error::{PreviewError, Result};

/// ANSI escape codes.
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Longest file name most filesystems accept, in bytes.
const MAX_FILENAME_BYTES: usize = 255;

/// Terminal-aware status printer.
///
/// Colour is enabled when stderr is a terminal.
pub struct Printer {
    color: bool,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// Print a status line with a green bold verb.
    /// e.g. "   Searching Okean Elzy - Obijmy"
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    /// Print an informational line with a cyan bold verb.
    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(CYAN, verb, message);
    }

    /// Print a warning line with a yellow bold verb.
    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

    /// Print an error line with a red bold verb.
    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    /// Format a string as dim/grey.
    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    /// Format a string as bold.
    pub fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(
                stderr,
                "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}"
            );
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pluralize a count: `plural(1, "swatch", "swatches")` → "1 swatch".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Return a relative display path when possible, absolute otherwise.
pub fn display_path(path: &Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}

/// Make `name` safe to use as a file name on common filesystems.
///
/// Path separators, reserved and control characters are removed, trailing
/// dots and spaces trimmed, reserved device names prefixed with `_` and the
/// result truncated to 255 bytes on a character boundary.
pub fn sanitize_filename(name: &str) -> String {
    let mut clean: String = name
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | '?' | '<' | '>' | ':' | '*' | '|' | '"'))
        .collect();

    if clean.len() > MAX_FILENAME_BYTES {
        let mut end = MAX_FILENAME_BYTES;
        while !clean.is_char_boundary(end) {
            end -= 1;
        }
        clean.truncate(end);
    }

    let trimmed = clean.trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        return "_".to_string();
    }
    if is_reserved_name(trimmed) {
        return format!("_{}", trimmed);
    }
    trimmed.to_string()
}

/// Windows device names, matched case-insensitively with or without an
/// extension.
fn is_reserved_name(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name).to_ascii_uppercase();
    matches!(stem.as_str(), "CON" | "PRN" | "AUX" | "NUL")
        || ((stem.starts_with("COM") || stem.starts_with("LPT"))
            && stem.len() == 4
            && stem.as_bytes()[3].is_ascii_digit())
}

/// Sanitized `name` with `extension` appended, the whole within 255 bytes.
pub fn filename_with_extension(name: &str, extension: &str) -> String {
    let mut stem = sanitize_filename(name);
    let budget = MAX_FILENAME_BYTES.saturating_sub(extension.len() + 1);
    if stem.len() > budget {
        let mut end = budget;
        while !stem.is_char_boundary(end) {
            end -= 1;
        }
        stem.truncate(end);
        // The cut can expose trailing dots or spaces again.
        let kept = stem.trim_end_matches(['.', ' ']).len();
        stem.truncate(kept);
        if stem.is_empty() {
            stem.push('_');
        }
    }
    format!("{}.{}", stem, extension)
}

/// File name of a release's preview: `Artist - Release.png`.
pub fn preview_filename(artist: &str, release: &str) -> String {
    filename_with_extension(&format!("{} - {}", artist, release), "png")
}

/// Write a rendered preview into `dir`, creating it if needed.
pub fn write_preview(dir: &Path, artist: &str, release: &str, png: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| PreviewError::Io {
        path: dir.to_path_buf(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    let path = dir.join(preview_filename(artist, release));
    fs::write(&path, png).map_err(|e| PreviewError::Io {
        path: path.clone(),
        message: format!("Failed to write preview: {}", e),
    })?;
    Ok(path)
}
