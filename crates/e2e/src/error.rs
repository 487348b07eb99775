//! Error types for E2E scenarios

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Playwright not found. Install with: npm i -D @playwright/test && npx playwright install")]
    PlaywrightNotFound,

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Selector not found: {selector} - {reason}")]
    SelectorNotFound { selector: String, reason: String },

    #[error("Session already closed")]
    SessionClosed,

    #[error("Site unreachable: {0}")]
    Unreachable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl E2eError {
    /// True for the failures a scenario can observe against the site:
    /// a failed expectation, a page that would not load, or a missing element.
    pub fn is_scenario_failure(&self) -> bool {
        matches!(
            self,
            E2eError::AssertionFailed(_)
                | E2eError::Navigation { .. }
                | E2eError::SelectorNotFound { .. }
        )
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
