//! Browser automation seam
//!
//! A [`Launcher`] hands out fresh, isolated [`Driver`]s. Each driver owns one
//! browser session until [`Driver::shutdown`] is called or it is dropped.

use serde_json::Value;

use crate::error::E2eResult;
use crate::protocol::Command;

/// One live browser session
#[async_trait::async_trait]
pub trait Driver: Send {
    /// Execute a command and wait for its reply
    async fn execute(&mut self, command: &Command) -> E2eResult<Value>;

    /// Close the browser. Calling it more than once is a no-op.
    async fn shutdown(&mut self) -> E2eResult<()>;
}

/// Source of fresh browser sessions
#[async_trait::async_trait]
pub trait Launcher: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &str;

    /// Start a new browser with no state shared with earlier sessions
    async fn launch(&self) -> E2eResult<Box<dyn Driver>>;
}
