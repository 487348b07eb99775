//! Playwright browser automation
//!
//! Each session is a `node` child process running an embedded driver script.
//! The script launches one browser, prints a readiness line, then answers one
//! [`Command`] per stdin line. It closes the browser on `close` or when stdin
//! reaches EOF, so dropping the Rust side never leaks a browser.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use serde_json::Value;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::driver::{Driver, Launcher};
use crate::error::{E2eError, E2eResult};
use crate::protocol::{Command as DriverCommand, Reply};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub browser: Browser,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Node executable used to run the driver script
    pub node_binary: PathBuf,

    /// Directory whose `node_modules` provides `@playwright/test`
    pub project_dir: PathBuf,

    /// How long the driver gets to acknowledge `close`, and then to exit,
    /// before it is killed
    pub shutdown_grace: Duration,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            browser: Browser::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            node_binary: PathBuf::from("node"),
            project_dir: PathBuf::from("."),
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

/// Build the Node driver script for a browser configuration
pub fn build_script(config: &PlaywrightConfig) -> String {
    format!(
        r#"
const path = require('path');
const readline = require('readline');
const {{ createRequire }} = require('module');

const pw = createRequire(path.join(process.cwd(), 'package.json'))('@playwright/test');
const send = (msg) => process.stdout.write(JSON.stringify(msg) + '\n');
const fail = (kind, error) =>
  send({{ ok: false, error: {{ kind, message: String((error && error.message) || error) }} }});

function classify(action, error) {{
  if (action.startsWith('expect_')) return 'assertion';
  if (action === 'navigate') return 'navigation';
  if ((action === 'click' || action === 'fill') && error && error.name === 'TimeoutError') {{
    return 'selector';
  }}
  return 'driver';
}}

async function handle(page, cmd) {{
  const {{ expect }} = pw;
  switch (cmd.action) {{
    case 'navigate': await page.goto(cmd.url); return null;
    case 'click': await page.click(cmd.selector); return null;
    case 'fill': await page.fill(cmd.selector, cmd.value); return null;
    case 'expect_title': await expect(page).toHaveTitle(cmd.title); return null;
    case 'expect_url': await expect(page).toHaveURL(cmd.url); return null;
    case 'expect_visible': await expect(page.locator(cmd.selector)).toBeVisible(); return null;
    case 'expect_hidden': await expect(page.locator(cmd.selector)).toBeHidden(); return null;
    case 'expect_text': await expect(page.locator(cmd.selector)).toHaveText(cmd.text); return null;
    case 'expect_attribute':
      await expect(page.locator(cmd.selector)).toHaveAttribute(cmd.name, cmd.value);
      return null;
    case 'expect_count': await expect(page.locator(cmd.selector)).toHaveCount(cmd.count); return null;
    default: throw new Error('unknown action: ' + cmd.action);
  }}
}}

(async () => {{
  let browser;
  try {{
    browser = await pw.{browser}.launch({{ headless: {headless} }});
    const context = await browser.newContext({{
      viewport: {{ width: {width}, height: {height} }}
    }});
    const page = await context.newPage();
    send({{ ok: true, value: 'ready' }});

    const lines = readline.createInterface({{ input: process.stdin }});
    for await (const line of lines) {{
      if (!line.trim()) continue;
      let cmd;
      try {{
        cmd = JSON.parse(line);
      }} catch (error) {{
        fail('driver', error);
        continue;
      }}
      if (cmd.action === 'close') break;
      try {{
        const value = await handle(page, cmd);
        send({{ ok: true, value }});
      }} catch (error) {{
        fail(classify(cmd.action, error), error);
      }}
    }}
  }} catch (error) {{
    fail('driver', error);
  }} finally {{
    if (browser) await browser.close();
  }}
  process.stdout.write(JSON.stringify({{ ok: true, value: 'closed' }}) + '\n', () => process.exit(0));
}})();
"#,
        browser = config.browser.as_str(),
        headless = config.headless,
        width = config.viewport_width,
        height = config.viewport_height,
    )
}

/// Launches one Playwright-driven browser per session
pub struct PlaywrightLauncher {
    config: PlaywrightConfig,
}

impl PlaywrightLauncher {
    /// Create a launcher after verifying Playwright is installed
    pub fn new(config: PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlaywrightConfig {
        &self.config
    }

    fn check_playwright_installed(config: &PlaywrightConfig) -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .current_dir(&config.project_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }
}

#[async_trait::async_trait]
impl Launcher for PlaywrightLauncher {
    fn name(&self) -> &str {
        self.config.browser.as_str()
    }

    async fn launch(&self) -> E2eResult<Box<dyn Driver>> {
        let driver = PlaywrightDriver::spawn(&self.config).await?;
        Ok(Box::new(driver))
    }
}

/// A running driver process and its browser
pub struct PlaywrightDriver {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    closed: bool,
    shutdown_grace: Duration,

    // Holds driver.js on disk for the lifetime of the process
    _script_dir: TempDir,
}

impl PlaywrightDriver {
    /// Spawn the driver and wait for its browser to be ready
    pub async fn spawn(config: &PlaywrightConfig) -> E2eResult<Self> {
        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("driver.js");
        tokio::fs::write(&script_path, build_script(config)).await?;

        debug!(
            "Spawning Playwright driver ({}, headless: {})",
            config.browser.as_str(),
            config.headless
        );

        let mut child = TokioCommand::new(&config.node_binary)
            .arg(&script_path)
            .current_dir(&config.project_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                E2eError::Driver(format!(
                    "Failed to spawn {}: {}",
                    config.node_binary.display(),
                    e
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::Driver("driver stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::Driver("driver stdout unavailable".to_string()))?;

        let mut driver = Self {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout),
            closed: false,
            shutdown_grace: config.shutdown_grace,
            _script_dir: script_dir,
        };

        let greeting = driver.read_reply().await?;
        if !greeting.ok {
            let reason = greeting
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| "no detail".to_string());
            // Nothing to close yet; let the process go
            driver.closed = true;
            let _ = driver.child.start_kill();
            return Err(E2eError::Driver(format!("Browser launch failed: {}", reason)));
        }

        trace!("Playwright driver ready");
        Ok(driver)
    }

    async fn read_reply(&mut self) -> E2eResult<Reply> {
        loop {
            let mut line = String::new();
            let read = self.stdout.read_line(&mut line).await?;
            if read == 0 {
                return Err(E2eError::Driver(
                    "driver exited before replying".to_string(),
                ));
            }
            if line.trim().is_empty() {
                continue;
            }
            trace!("driver -> {}", line.trim());
            return Reply::from_line(&line);
        }
    }
}

#[async_trait::async_trait]
impl Driver for PlaywrightDriver {
    async fn execute(&mut self, command: &DriverCommand) -> E2eResult<Value> {
        if self.closed {
            return Err(E2eError::SessionClosed);
        }

        let line = command.to_line()?;
        trace!("driver <- {}", command.describe());

        let stdin = self.stdin.as_mut().ok_or(E2eError::SessionClosed)?;
        stdin.write_all(line.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;

        self.read_reply().await?.into_result(command)
    }

    async fn shutdown(&mut self) -> E2eResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if let Some(mut stdin) = self.stdin.take() {
            let line = DriverCommand::Close.to_line()?;
            if stdin.write_all(line.as_bytes()).await.is_ok() {
                let _ = stdin.write_all(b"\n").await;
                let _ = stdin.flush().await;
            }
            // Dropping stdin gives the driver EOF even if the write failed
        }

        let grace = self.shutdown_grace;
        match timeout(grace, self.read_reply()).await {
            Ok(Ok(reply)) if reply.ok => debug!("Browser closed"),
            Ok(Ok(reply)) => warn!("Driver reported error on close: {:?}", reply.error),
            Ok(Err(e)) => debug!("No close acknowledgement: {}", e),
            Err(_) => warn!("Driver did not acknowledge close within {:?}", grace),
        }

        match timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => {
                debug!("Driver exited with {}", status);
                Ok(())
            }
            Ok(Err(e)) => Err(E2eError::Io(e)),
            Err(_) => {
                warn!("Driver still running after close, killing it");
                self.child.kill().await?;
                Ok(())
            }
        }
    }
}

impl Drop for PlaywrightDriver {
    fn drop(&mut self) {
        if !self.closed {
            warn!("Playwright driver dropped without shutdown, killing browser process");
            let _ = self.child.start_kill();
        }
    }
}
