//! User-facing output.
//!
//! Everything the tool says goes through [`emit`]: a level, a stable event
//! code and a message, plus optional structured data. Text mode prints the
//! message with a colored marker; JSON mode prints one object per line so the
//! output can be piped into `jq`.

use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
    Debug,
}

impl Level {
    /// Marker printed before the message in text mode.
    fn marker(self) -> Option<ColoredString> {
        match self {
            Level::Info => None,
            Level::Success => Some("✓".green().bold()),
            Level::Warn => Some("!".yellow().bold()),
            Level::Error => Some("✗".red().bold()),
            Level::Debug => Some("·".cyan()),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Level::Warn | Level::Error)
    }
}

#[derive(Debug, Clone, Copy)]
struct OutputSettings {
    format: OutputFormat,
    color: bool,
}

static SETTINGS: RwLock<OutputSettings> = RwLock::new(OutputSettings {
    format: OutputFormat::Text,
    color: true,
});

static DEBUG_MODE: AtomicBool = AtomicBool::new(false);

pub fn set_debug_mode(enabled: bool) {
    DEBUG_MODE.store(enabled, Ordering::Relaxed);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_MODE.load(Ordering::Relaxed)
}

pub fn init(format: OutputFormat, color: bool) {
    if let Ok(mut settings) = SETTINGS.write() {
        *settings = OutputSettings { format, color };
    }
    colored::control::set_override(color);
}

fn settings() -> OutputSettings {
    SETTINGS.read().map(|s| *s).unwrap_or(OutputSettings {
        format: OutputFormat::Text,
        color: true,
    })
}

pub fn get_output_format() -> OutputFormat {
    settings().format
}

#[derive(Serialize)]
struct Event<'a> {
    level: Level,
    code: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

/// Drop terminal escape sequences (`ESC [ ... final`) from a message.
fn plain(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut chars = message.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

fn json_line(level: Level, code: &str, message: &str, data: Option<serde_json::Value>) -> String {
    let event = Event {
        level,
        code,
        message: plain(message),
        data,
    };
    serde_json::to_string(&event).unwrap_or_else(|_| plain(message))
}

fn text_line(level: Level, message: &str, color: bool) -> String {
    let body = match (level, color) {
        (Level::Error, true) => message.red().to_string(),
        (Level::Debug, true) => message.dimmed().to_string(),
        _ => message.to_string(),
    };
    match level.marker() {
        Some(marker) => format!("{} {}", marker, body),
        None => body,
    }
}

pub fn emit(level: Level, code: &str, message: &str, data: Option<serde_json::Value>) {
    if level == Level::Debug && !is_debug_enabled() {
        return;
    }

    let settings = settings();
    let line = match settings.format {
        OutputFormat::Text => text_line(level, message, settings.color),
        OutputFormat::Json => json_line(level, code, message, data),
    };
    // A closed pipe is not worth a panic.
    let _ = if level.to_stderr() {
        writeln!(io::stderr(), "{}", line)
    } else {
        writeln!(io::stdout(), "{}", line)
    };
}

/// Horizontal rule between sections. Nothing in JSON mode.
pub fn separator(light: bool) {
    if get_output_format() == OutputFormat::Json {
        return;
    }
    let glyph = if light { "─" } else { "━" };
    let _ = writeln!(io::stdout(), "{}", glyph.repeat(60));
}

pub mod prelude {
    pub use super::{Level, OutputFormat, emit, get_output_format, separator};
}
