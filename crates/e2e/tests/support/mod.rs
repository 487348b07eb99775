//! In-process stand-in for the browser, shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use swaglabs_e2e::protocol::{Command, FailureKind, Reply};
use swaglabs_e2e::site::DEFAULT_BASE_URL;
use swaglabs_e2e::{Driver, E2eError, E2eResult, Launcher, ScenarioRunner, Site};

/// Everything one session was asked to do
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    pub commands: Vec<Command>,
    pub shutdowns: usize,
}

struct Failure {
    matches: fn(&Command) -> bool,
    kind: FailureKind,
    message: &'static str,
}

#[derive(Default)]
struct State {
    sessions: Vec<SessionLog>,
    failure: Option<Failure>,
    refuse_launch: bool,
    fail_shutdown: bool,
}

/// A browser that accepts every command unless told otherwise
#[derive(Clone, Default)]
pub struct FakeBrowser {
    state: Arc<Mutex<State>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the first matching command of every session with a failure
    pub fn failing_on(
        self,
        matches: fn(&Command) -> bool,
        kind: FailureKind,
        message: &'static str,
    ) -> Self {
        self.state.lock().failure = Some(Failure {
            matches,
            kind,
            message,
        });
        self
    }

    pub fn refusing_launch(self) -> Self {
        self.state.lock().refuse_launch = true;
        self
    }

    pub fn failing_shutdown(self) -> Self {
        self.state.lock().fail_shutdown = true;
        self
    }

    pub fn launcher(&self) -> Box<dyn Launcher> {
        Box::new(FakeLauncher {
            state: self.state.clone(),
        })
    }

    pub fn runner(&self) -> ScenarioRunner {
        ScenarioRunner::new(self.launcher(), site())
    }

    pub fn sessions(&self) -> Vec<SessionLog> {
        self.state.lock().sessions.clone()
    }
}

pub fn site() -> Site {
    Site::new(DEFAULT_BASE_URL).unwrap()
}

struct FakeLauncher {
    state: Arc<Mutex<State>>,
}

#[async_trait::async_trait]
impl Launcher for FakeLauncher {
    fn name(&self) -> &str {
        "fake"
    }

    async fn launch(&self) -> E2eResult<Box<dyn Driver>> {
        let mut state = self.state.lock();
        if state.refuse_launch {
            return Err(E2eError::Driver("Browser launch failed: no display".into()));
        }
        state.sessions.push(SessionLog::default());
        Ok(Box::new(FakeDriver {
            state: self.state.clone(),
            index: state.sessions.len() - 1,
        }))
    }
}

struct FakeDriver {
    state: Arc<Mutex<State>>,
    index: usize,
}

#[async_trait::async_trait]
impl Driver for FakeDriver {
    async fn execute(&mut self, command: &Command) -> E2eResult<Value> {
        let mut state = self.state.lock();
        state.sessions[self.index].commands.push(command.clone());

        let reply = match &state.failure {
            Some(failure) if (failure.matches)(command) => {
                Reply::failure(failure.kind, failure.message)
            }
            _ => Reply::success(Value::Null),
        };
        reply.into_result(command)
    }

    async fn shutdown(&mut self) -> E2eResult<()> {
        let mut state = self.state.lock();
        state.sessions[self.index].shutdowns += 1;
        if state.fail_shutdown {
            return Err(E2eError::Driver("driver exited before replying".into()));
        }
        Ok(())
    }
}

pub fn navigate(url: &str) -> Command {
    Command::Navigate { url: url.into() }
}

pub fn click(selector: &str) -> Command {
    Command::Click {
        selector: selector.into(),
    }
}

pub fn fill(selector: &str, value: &str) -> Command {
    Command::Fill {
        selector: selector.into(),
        value: value.into(),
    }
}

pub fn expect_url(url: &str) -> Command {
    Command::ExpectUrl { url: url.into() }
}

pub fn expect_visible(selector: &str) -> Command {
    Command::ExpectVisible {
        selector: selector.into(),
    }
}

pub fn expect_text(selector: &str, text: &str) -> Command {
    Command::ExpectText {
        selector: selector.into(),
        text: text.into(),
    }
}

pub fn expect_count(selector: &str, count: usize) -> Command {
    Command::ExpectCount {
        selector: selector.into(),
        count,
    }
}

/// Root navigation plus the three login form interactions
pub fn login(username: &str, password: &str) -> Vec<Command> {
    vec![
        navigate(DEFAULT_BASE_URL),
        fill("#user-name", username),
        fill("#password", password),
        click("#login-button"),
    ]
}
