use std::path::PathBuf;

use truthguard_core::{InputMode, Theme};

use crate::cli::parse_theme;

pub const HELP: &str = "\
Commands:
  mode text|url|image   switch the input tab
  text <article text>   set the text to analyse
  url <address>         set the article URL
  image <path>          read a PNG or JPEG screenshot with OCR
  detect                run the detection for the current tab
  theme light|dark|system
  show                  print the current form and result
  help                  this list
  quit                  leave the session";

/// One line typed in an interactive session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Mode(InputMode),
    Text(String),
    Url(String),
    Image(PathBuf),
    Detect,
    Theme(Theme),
    Show,
    Help,
    Quit,
}

/// Parses one input line; blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(None);
    }
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "mode" => SessionCommand::Mode(parse_mode(rest.trim())?),
        "text" => SessionCommand::Text(rest.to_string()),
        "url" => SessionCommand::Url(rest.trim().to_string()),
        "image" => {
            let path = rest.trim();
            if path.is_empty() {
                return Err("usage: image <path>".to_string());
            }
            SessionCommand::Image(PathBuf::from(path))
        }
        "detect" => SessionCommand::Detect,
        "theme" => SessionCommand::Theme(parse_theme(rest)?),
        "show" => SessionCommand::Show,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => return Err(format!("unknown command `{other}`; type `help`")),
    };
    Ok(Some(command))
}

fn parse_mode(value: &str) -> Result<InputMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "text" => Ok(InputMode::Text),
        "url" => Ok(InputMode::Url),
        "image" => Ok(InputMode::Image),
        _ => Err(format!("unknown mode `{value}` (text, url, image)")),
    }
}
