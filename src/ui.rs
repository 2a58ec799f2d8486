//! Styled console messages.
//!
//! Every helper is a pure formatter. Helpers that end a command return an
//! [`Outro`] carrying the exit code, and only `main` turns that into a process
//! exit.

use console::style;
use std::fmt;

pub const DEFAULT_CANCEL_MESSAGE: &str = "Operation canceled";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation successful";
pub const DEFAULT_ERROR_TITLE: &str = "An error occurred";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outro {
    pub text: String,
    /// `None` leaves the exit status at its default (success).
    pub exit_code: Option<i32>,
}

impl Outro {
    pub fn print(&self) {
        println!("{}", self.text);
    }

    pub fn exit(self) -> ! {
        self.print();
        std::process::exit(self.exit_code.unwrap_or(0));
    }
}

/// Error text normalized from the shapes a command can fail with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    Text(String),
    Structured { message: String },
}

impl ErrorMessage {
    pub fn message(&self) -> &str {
        match self {
            ErrorMessage::Text(text) => text,
            ErrorMessage::Structured { message } => message,
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<&str> for ErrorMessage {
    fn from(text: &str) -> Self {
        ErrorMessage::Text(text.to_string())
    }
}

impl From<String> for ErrorMessage {
    fn from(text: String) -> Self {
        ErrorMessage::Text(text)
    }
}

impl From<&anyhow::Error> for ErrorMessage {
    fn from(err: &anyhow::Error) -> Self {
        // `{:#}` keeps the context chain on one line
        ErrorMessage::Structured {
            message: format!("{:#}", err),
        }
    }
}

impl From<anyhow::Error> for ErrorMessage {
    fn from(err: anyhow::Error) -> Self {
        ErrorMessage::from(&err)
    }
}

fn padded(msg: &str) -> String {
    format!(" {} ", msg)
}

pub fn title_message(msg: &str) -> String {
    style(padded(msg)).reverse().to_string()
}

pub fn warn_message(msg: &str) -> String {
    style(msg).yellow().to_string()
}

pub fn cancel_message(msg: Option<&str>) -> Outro {
    Outro {
        text: msg.unwrap_or(DEFAULT_CANCEL_MESSAGE).to_string(),
        exit_code: None,
    }
}

pub fn cancel_outro(msg: Option<&str>) -> Outro {
    Outro {
        text: format!(
            "{}\n",
            style(padded(msg.unwrap_or(DEFAULT_CANCEL_MESSAGE))).reverse()
        ),
        exit_code: Some(0),
    }
}

pub fn notice_outro(msg: &str) -> Outro {
    Outro {
        text: format!("{}\n", style(padded(msg)).on_blue()),
        exit_code: Some(0),
    }
}

pub fn success_outro(msg: Option<&str>) -> Outro {
    Outro {
        text: format!(
            "{}\n",
            style(padded(msg.unwrap_or(DEFAULT_SUCCESS_MESSAGE))).on_green()
        ),
        exit_code: Some(0),
    }
}

pub fn error_outro(msg: &str, title: Option<&str>) -> Outro {
    let text = match title {
        Some(title) => format!("{}\n{}\n", style(padded(title)).on_red(), msg),
        None => format!("{}\n", style(padded(msg)).on_red()),
    };
    Outro {
        text,
        exit_code: Some(1),
    }
}

pub fn error_message(err: impl Into<ErrorMessage>, title: Option<&str>) -> Outro {
    let err = err.into();
    error_outro(err.message(), Some(title.unwrap_or(DEFAULT_ERROR_TITLE)))
}
