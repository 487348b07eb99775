//! A browser session owned by one scenario
//!
//! Every interaction blocks until the automation layer resolves it or gives
//! up under its default wait policy. Nothing is retried here.

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::driver::Driver;
use crate::error::{E2eError, E2eResult};
use crate::protocol::Command;
use crate::site::Site;

pub struct Session {
    id: Uuid,
    driver: Box<dyn Driver>,
    site: Site,
    closed: bool,
}

impl Session {
    pub fn new(driver: Box<dyn Driver>, site: Site) -> Self {
        Self {
            id: Uuid::new_v4(),
            driver,
            site,
            closed: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    async fn execute(&mut self, command: Command) -> E2eResult<Value> {
        if self.closed {
            return Err(E2eError::SessionClosed);
        }
        debug!(session = %self.id, "{}", command.describe());
        self.driver.execute(&command).await
    }

    /// Load an absolute URL
    pub async fn goto(&mut self, url: &str) -> E2eResult<()> {
        self.execute(Command::Navigate {
            url: url.to_string(),
        })
        .await
        .map(drop)
    }

    /// Load a path relative to the site root
    pub async fn open(&mut self, path: &str) -> E2eResult<()> {
        let url = self.site.url(path)?;
        self.goto(&url).await
    }

    pub async fn click(&mut self, selector: &str) -> E2eResult<()> {
        self.execute(Command::Click {
            selector: selector.to_string(),
        })
        .await
        .map(drop)
    }

    pub async fn fill(&mut self, selector: &str, value: &str) -> E2eResult<()> {
        self.execute(Command::Fill {
            selector: selector.to_string(),
            value: value.to_string(),
        })
        .await
        .map(drop)
    }

    pub async fn expect_title(&mut self, title: &str) -> E2eResult<()> {
        self.execute(Command::ExpectTitle {
            title: title.to_string(),
        })
        .await
        .map(drop)
    }

    pub async fn expect_url(&mut self, url: &str) -> E2eResult<()> {
        self.execute(Command::ExpectUrl {
            url: url.to_string(),
        })
        .await
        .map(drop)
    }

    /// Expect the page to be at a path relative to the site root
    pub async fn expect_path(&mut self, path: &str) -> E2eResult<()> {
        let url = self.site.url(path)?;
        self.expect_url(&url).await
    }

    pub async fn expect_visible(&mut self, selector: &str) -> E2eResult<()> {
        self.execute(Command::ExpectVisible {
            selector: selector.to_string(),
        })
        .await
        .map(drop)
    }

    pub async fn expect_hidden(&mut self, selector: &str) -> E2eResult<()> {
        self.execute(Command::ExpectHidden {
            selector: selector.to_string(),
        })
        .await
        .map(drop)
    }

    pub async fn expect_text(&mut self, selector: &str, text: &str) -> E2eResult<()> {
        self.execute(Command::ExpectText {
            selector: selector.to_string(),
            text: text.to_string(),
        })
        .await
        .map(drop)
    }

    pub async fn expect_attribute(
        &mut self,
        selector: &str,
        name: &str,
        value: &str,
    ) -> E2eResult<()> {
        self.execute(Command::ExpectAttribute {
            selector: selector.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        })
        .await
        .map(drop)
    }

    pub async fn expect_count(&mut self, selector: &str, count: usize) -> E2eResult<()> {
        self.execute(Command::ExpectCount {
            selector: selector.to_string(),
            count,
        })
        .await
        .map(drop)
    }

    /// Close the browser. Idempotent.
    pub async fn close(&mut self) -> E2eResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        debug!(session = %self.id, "closing session");
        self.driver.shutdown().await
    }
}
