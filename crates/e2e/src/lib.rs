//! Swag Labs storefront E2E checks
//!
//! Browser scenarios for the public demo store (login, cart, checkout,
//! logout) driven from Rust through Playwright.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ScenarioRunner (Rust)                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  run(scenario)                                              │
//! │    ├── launcher.launch() -> Session        (acquire)        │
//! │    ├── (scenario.run)(&mut session)        (act + assert)   │
//! │    ├── session.close()                     (always)         │
//! │    └── ScenarioResult                      (report)         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  LoginPage<'s> ──borrows──> Session ──owns──> Driver        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PlaywrightDriver: node child process, one JSON line per    │
//! │  command / reply (navigate, click, fill, expect_*, close)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod driver;
pub mod error;
pub mod pages;
pub mod playwright;
pub mod protocol;
pub mod runner;
pub mod scenario;
pub mod scenarios;
pub mod session;
pub mod site;

pub use driver::{Driver, Launcher};
pub use error::{E2eError, E2eResult};
pub use pages::LoginPage;
pub use runner::{RunnerConfig, ScenarioResult, ScenarioRunner, SuiteResult};
pub use scenario::Scenario;
pub use session::Session;
pub use site::Site;
