//! Line-delimited JSON protocol spoken with the Playwright driver process
//!
//! Every command is one JSON object on one line, tagged by `action`. The
//! driver answers each command with exactly one [`Reply`] line.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{E2eError, E2eResult};

/// A single browser command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// Load a URL in the current page
    Navigate { url: String },

    /// Click an element
    Click { selector: String },

    /// Fill an input field, replacing its value
    Fill { selector: String, value: String },

    /// Expect the page title to equal `title`
    ExpectTitle { title: String },

    /// Expect the page URL to equal `url`
    ExpectUrl { url: String },

    /// Expect an element to be visible
    ExpectVisible { selector: String },

    /// Expect an element to be hidden or absent
    ExpectHidden { selector: String },

    /// Expect an element's text to equal `text`
    ExpectText { selector: String, text: String },

    /// Expect an element attribute to equal `value`
    ExpectAttribute {
        selector: String,
        name: String,
        value: String,
    },

    /// Expect exactly `count` elements to match
    ExpectCount { selector: String, count: usize },

    /// Close the browser and end the driver process
    Close,
}

impl Command {
    /// Short human-readable name used in logs and failure messages
    pub fn describe(&self) -> String {
        match self {
            Command::Navigate { url } => format!("navigate:{}", url),
            Command::Click { selector } => format!("click:{}", selector),
            Command::Fill { selector, .. } => format!("fill:{}", selector),
            Command::ExpectTitle { title } => format!("expect_title:{}", title),
            Command::ExpectUrl { url } => format!("expect_url:{}", url),
            Command::ExpectVisible { selector } => format!("expect_visible:{}", selector),
            Command::ExpectHidden { selector } => format!("expect_hidden:{}", selector),
            Command::ExpectText { selector, text } => {
                format!("expect_text:{} == {:?}", selector, text)
            }
            Command::ExpectAttribute {
                selector,
                name,
                value,
            } => format!("expect_attribute:{}[{}] == {:?}", selector, name, value),
            Command::ExpectCount { selector, count } => {
                format!("expect_count:{} == {}", selector, count)
            }
            Command::Close => "close".to_string(),
        }
    }

    /// The URL or selector the command acts on, if any
    pub fn target(&self) -> &str {
        match self {
            Command::Navigate { url } | Command::ExpectUrl { url } => url,
            Command::Click { selector }
            | Command::Fill { selector, .. }
            | Command::ExpectVisible { selector }
            | Command::ExpectHidden { selector }
            | Command::ExpectText { selector, .. }
            | Command::ExpectAttribute { selector, .. }
            | Command::ExpectCount { selector, .. } => selector,
            Command::ExpectTitle { .. } | Command::Close => "",
        }
    }

    /// Encode as a single protocol line (without the trailing newline)
    pub fn to_line(&self) -> E2eResult<String> {
        serde_json::to_string(self).map_err(E2eError::from)
    }
}

/// How the driver classified a failed command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Assertion,
    Navigation,
    Selector,
    #[serde(other)]
    Driver,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyError {
    pub kind: FailureKind,
    pub message: String,
}

/// One reply line from the driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub ok: bool,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub error: Option<ReplyError>,
}

impl Reply {
    pub fn success(value: Value) -> Self {
        Self {
            ok: true,
            value: Some(value),
            error: None,
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            value: None,
            error: Some(ReplyError {
                kind,
                message: message.into(),
            }),
        }
    }

    /// Parse a reply line
    pub fn from_line(line: &str) -> E2eResult<Self> {
        serde_json::from_str(line.trim())
            .map_err(|e| E2eError::Driver(format!("Invalid reply {:?}: {}", line.trim(), e)))
    }

    /// Turn the reply to `command` into its value or a typed error
    pub fn into_result(self, command: &Command) -> E2eResult<Value> {
        if self.ok {
            return Ok(self.value.unwrap_or(Value::Null));
        }

        let Some(error) = self.error else {
            return Err(E2eError::Driver(format!(
                "{} failed without detail",
                command.describe()
            )));
        };

        Err(match error.kind {
            FailureKind::Assertion => {
                E2eError::AssertionFailed(format!("{} - {}", command.describe(), error.message))
            }
            FailureKind::Navigation => E2eError::Navigation {
                url: command.target().to_string(),
                reason: error.message,
            },
            FailureKind::Selector => E2eError::SelectorNotFound {
                selector: command.target().to_string(),
                reason: error.message,
            },
            FailureKind::Driver => {
                E2eError::Driver(format!("{} - {}", command.describe(), error.message))
            }
        })
    }
}
