//! PlaywrightDriver process handling against scripted stand-ins for node
//!
//! Each stand-in is a small `sh` script put where the node binary would be.
//! It ignores the driver.js argument and speaks the line protocol itself.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use swaglabs_e2e::playwright::{PlaywrightConfig, PlaywrightDriver};
use swaglabs_e2e::protocol::Command;
use swaglabs_e2e::{Driver, E2eError};

const READY: &str = r#"echo '{"ok":true,"value":"ready"}'"#;

/// Greets, then answers by action until told to close
const COOPERATIVE: &str = r#"
while IFS= read -r line; do
  case "$line" in
    *'"action":"close"'*) echo '{"ok":true,"value":"closed"}'; exit 0 ;;
    *'"action":"click"'*) echo; echo '{"ok":true}' ;;
    *'"action":"expect_url"'*) echo '{"ok":false,"error":{"kind":"assertion","message":"nope"}}' ;;
    *'"action":"navigate"'*) echo '{"ok":false,"error":{"kind":"navigation","message":"net::ERR_NAME_NOT_RESOLVED"}}' ;;
    *'"action":"fill"'*) echo '{"ok":false,"error":{"kind":"selector","message":"Timeout 30000ms exceeded"}}' ;;
    *) echo '{"ok":false,"error":{"kind":"driver","message":"unknown action"}}' ;;
  esac
done
"#;

/// Browser launch fails before the greeting
const NO_BROWSER: &str =
    r#"echo '{"ok":false,"error":{"kind":"driver","message":"no browser"}}'"#;

/// Reads one command and dies without answering
const CRASHING: &str = r#"
read -r line
exit 1
"#;

/// Never acknowledges close and never exits on its own
const HUNG: &str = "exec sleep 30";

/// Writes every stand-in once, before any test spawns one, so no script is
/// still open for writing while another is exec'd.
fn stand_ins() -> &'static PathBuf {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("driver-stand-ins");
        std::fs::create_dir_all(&dir).unwrap();

        let scripts = [
            ("cooperative", format!("{}\n{}", READY, COOPERATIVE)),
            ("no-browser", NO_BROWSER.to_string()),
            ("crashing", format!("{}\n{}", READY, CRASHING)),
            ("hung", format!("{}\n{}", READY, HUNG)),
        ];
        for (name, body) in scripts {
            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        dir
    })
}

fn config(stand_in: &str) -> PlaywrightConfig {
    let dir = stand_ins();
    PlaywrightConfig {
        node_binary: dir.join(stand_in),
        project_dir: dir.clone(),
        shutdown_grace: Duration::from_millis(300),
        ..PlaywrightConfig::default()
    }
}

#[tokio::test]
async fn replies_map_to_typed_errors() {
    let mut driver = PlaywrightDriver::spawn(&config("cooperative")).await.unwrap();

    // Preceded by a blank line
    let value = driver
        .execute(&Command::Click {
            selector: "#login-button".into(),
        })
        .await
        .unwrap();
    assert!(value.is_null());

    match driver
        .execute(&Command::ExpectUrl {
            url: "https://www.saucedemo.com/inventory.html".into(),
        })
        .await
    {
        Err(E2eError::AssertionFailed(msg)) => {
            assert_eq!(
                msg,
                "expect_url:https://www.saucedemo.com/inventory.html - nope"
            )
        }
        other => panic!("unexpected result: {:?}", other),
    }

    match driver
        .execute(&Command::Navigate {
            url: "https://store.invalid/".into(),
        })
        .await
    {
        Err(E2eError::Navigation { url, reason }) => {
            assert_eq!(url, "https://store.invalid/");
            assert_eq!(reason, "net::ERR_NAME_NOT_RESOLVED");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    match driver
        .execute(&Command::Fill {
            selector: "#first-name".into(),
            value: "John".into(),
        })
        .await
    {
        Err(E2eError::SelectorNotFound { selector, .. }) => assert_eq!(selector, "#first-name"),
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(matches!(
        driver
            .execute(&Command::ExpectTitle {
                title: "Swag Labs".into()
            })
            .await,
        Err(E2eError::Driver(_))
    ));

    driver.shutdown().await.unwrap();
    assert!(matches!(
        driver
            .execute(&Command::Click {
                selector: "#login-button".into()
            })
            .await,
        Err(E2eError::SessionClosed)
    ));

    // A second shutdown is a no-op
    driver.shutdown().await.unwrap();
}

#[tokio::test]
async fn failed_greeting_is_a_launch_failure() {
    let start = Instant::now();
    let Err(error) = PlaywrightDriver::spawn(&config("no-browser")).await else {
        panic!("driver started without a browser");
    };

    match error {
        E2eError::Driver(msg) => assert_eq!(msg, "Browser launch failed: no browser"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn missing_node_binary_is_a_launch_failure() {
    let Err(error) = PlaywrightDriver::spawn(&config("not-there")).await else {
        panic!("driver started from a missing binary");
    };
    assert!(matches!(error, E2eError::Driver(msg) if msg.starts_with("Failed to spawn")));
}

#[tokio::test]
async fn driver_exiting_mid_command_is_a_driver_error() {
    let mut driver = PlaywrightDriver::spawn(&config("crashing")).await.unwrap();

    match driver
        .execute(&Command::Click {
            selector: "#checkout".into(),
        })
        .await
    {
        Err(E2eError::Driver(msg)) => assert_eq!(msg, "driver exited before replying"),
        other => panic!("unexpected result: {:?}", other),
    }

    // Releasing an already dead driver still succeeds
    driver.shutdown().await.unwrap();
}

#[tokio::test]
async fn unresponsive_driver_is_killed_after_grace() {
    let mut driver = PlaywrightDriver::spawn(&config("hung")).await.unwrap();

    let start = Instant::now();
    driver.shutdown().await.unwrap();
    let elapsed = start.elapsed();

    // One grace period for the acknowledgement, one for the exit, then kill
    assert!(elapsed >= Duration::from_millis(600), "{:?}", elapsed);
    assert!(elapsed < Duration::from_secs(10), "{:?}", elapsed);
}
