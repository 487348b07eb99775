//! Scenario runner
//!
//! Owns the session lifecycle for every scenario: acquire a fresh browser,
//! hand the session to the procedure, always release it, then report.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use tracing::field::{self, Empty};
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use crate::driver::Launcher;
use crate::error::{E2eError, E2eResult};
use crate::playwright::{PlaywrightConfig, PlaywrightLauncher};
use crate::scenario::Scenario;
use crate::scenarios;
use crate::session::Session;
use crate::site::{Site, SiteConfig};

/// Outcome of one scenario
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub duration: Duration,
    pub error: Option<String>,

    /// True when the scenario stopped on a failed expectation, a page that
    /// would not load or a missing element, rather than on a harness problem
    pub site_failure: bool,

    /// False only if a session was acquired and closing it failed
    pub session_released: bool,
}

/// Outcome of a batch of scenarios
#[derive(Debug, Clone)]
pub struct SuiteResult {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration: Duration,
    pub results: Vec<ScenarioResult>,
}

impl SuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// Configuration for the runner
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    pub site: SiteConfig,
    pub playwright: PlaywrightConfig,
}

pub struct ScenarioRunner {
    launcher: Box<dyn Launcher>,
    site: Site,
    site_config: SiteConfig,
}

impl ScenarioRunner {
    /// Runner over an arbitrary launcher; no reachability probe
    pub fn new(launcher: Box<dyn Launcher>, site: Site) -> Self {
        Self {
            launcher,
            site,
            site_config: SiteConfig {
                probe: false,
                ..SiteConfig::default()
            },
        }
    }

    /// Playwright-backed runner from configuration
    pub fn with_config(config: RunnerConfig) -> E2eResult<Self> {
        let site = Site::new(&config.site.base_url)?;
        let launcher = PlaywrightLauncher::new(config.playwright)?;
        Ok(Self {
            launcher: Box::new(launcher),
            site,
            site_config: config.site,
        })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Probe the site once if configured to
    pub async fn preflight(&self) -> E2eResult<()> {
        if !self.site_config.probe {
            return Ok(());
        }
        self.site.probe(self.site_config.probe_timeout).await
    }

    /// Run every registered scenario
    pub async fn run_all(&self) -> SuiteResult {
        self.run_scenarios(scenarios::all()).await
    }

    /// Run scenarios carrying `tag`
    pub async fn run_tagged(&self, tag: &str) -> SuiteResult {
        self.run_scenarios(&scenarios::tagged(tag)).await
    }

    /// Run one scenario by name
    pub async fn run_named(&self, name: &str) -> E2eResult<ScenarioResult> {
        let scenario =
            scenarios::find(name).ok_or_else(|| E2eError::ScenarioNotFound(name.to_string()))?;
        Ok(self.run(scenario).await)
    }

    /// Run scenarios one after another. Each gets its own session.
    pub async fn run_scenarios(&self, scenarios: &[Scenario]) -> SuiteResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut results = Vec::with_capacity(scenarios.len());

        info!(
            "Running {} scenario(s) on {} against {}",
            scenarios.len(),
            self.launcher.name(),
            self.site.root_url()
        );

        for scenario in scenarios {
            let result = self.run(scenario).await;
            if result.success {
                info!("✓ {} ({} ms)", result.name, result.duration.as_millis());
            } else {
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let passed = results.iter().filter(|r| r.success).count();
        let failed = results.len() - passed;
        let duration = start.elapsed();

        info!(
            "Scenario results: {} passed, {} failed ({} ms)",
            passed,
            failed,
            duration.as_millis()
        );

        SuiteResult {
            started_at,
            total: results.len(),
            passed,
            failed,
            duration,
            results,
        }
    }

    /// Run a single scenario through its full lifecycle
    pub async fn run(&self, scenario: &Scenario) -> ScenarioResult {
        let span = info_span!("scenario", name = scenario.name, session = Empty);
        self.run_inner(scenario).instrument(span).await
    }

    async fn run_inner(&self, scenario: &Scenario) -> ScenarioResult {
        let start = Instant::now();

        let driver = match self.launcher.launch().await {
            Ok(driver) => driver,
            Err(e) => {
                return ScenarioResult {
                    name: scenario.name.to_string(),
                    success: false,
                    duration: start.elapsed(),
                    error: Some(format!("failed to acquire session: {}", e)),
                    site_failure: false,
                    session_released: true,
                };
            }
        };

        let mut session = Session::new(driver, self.site.clone());
        Span::current().record("session", field::display(session.id()));
        debug!("session acquired");

        let outcome = AssertUnwindSafe((scenario.run)(&mut session))
            .catch_unwind()
            .await;

        let (mut error, site_failure) = match outcome {
            Ok(Ok(())) => (None, false),
            Ok(Err(e)) => (Some(e.to_string()), e.is_scenario_failure()),
            Err(panic) => (
                Some(format!(
                    "scenario panicked: {}",
                    panic_message(panic.as_ref())
                )),
                false,
            ),
        };

        let session_released = match session.close().await {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to release session: {}", e);
                if error.is_none() {
                    error = Some(format!("failed to release session: {}", e));
                }
                false
            }
        };

        ScenarioResult {
            name: scenario.name.to_string(),
            success: error.is_none(),
            duration: start.elapsed(),
            error,
            site_failure,
            session_released,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
