//! The site under test: base URL, reachability probe, and the fixed markup
//! contract (selectors, copy, accounts) the scenarios depend on.

use std::time::Duration;

use reqwest::Url;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com/";

/// Site paths relative to the base URL
pub mod paths {
    pub const INVENTORY: &str = "inventory.html";
    pub const CART: &str = "cart.html";

    pub fn inventory_item(id: u32) -> String {
        format!("inventory-item.html?id={}", id)
    }
}

pub mod selectors {
    pub const USERNAME_INPUT: &str = "#user-name";
    pub const PASSWORD_INPUT: &str = "#password";
    pub const LOGIN_BUTTON: &str = "#login-button";
    pub const ERROR_BANNER: &str = "[data-test=\"error\"]";

    pub const MENU_BUTTON: &str = "#react-burger-menu-btn";
    pub const MENU_PANEL: &str = ".bm-menu-wrap";
    pub const LOGOUT_LINK: &str = "#logout_sidebar_link";

    pub const ADD_TO_CART: &str = "#add-to-cart";
    pub const CART_ITEM: &str = ".cart_item";
    pub const CART_ITEM_NAME: &str = ".inventory_item_name";
    pub const REMOVE_BACKPACK: &str = "#remove-sauce-labs-backpack";

    pub const CHECKOUT: &str = "#checkout";
    pub const FIRST_NAME: &str = "#first-name";
    pub const LAST_NAME: &str = "#last-name";
    pub const POSTAL_CODE: &str = "#postal-code";
    pub const CONTINUE: &str = "#continue";
    pub const FINISH: &str = "#finish";
    pub const COMPLETE_HEADER: &str = ".complete-header";

    /// Title link of an inventory item on the product list
    pub fn item_title_link(id: u32) -> String {
        format!("#item_{}_title_link", id)
    }
}

/// Copy strings shown by the site
pub mod copy {
    pub const TITLE: &str = "Swag Labs";
    pub const USERNAME_REQUIRED: &str = "Epic sadface: Username is required";
    pub const LOCKED_OUT: &str = "Epic sadface: Sorry, this user has been locked out.";
    pub const ORDER_COMPLETE: &str = "Thank you for your order!";
    pub const BACKPACK: &str = "Sauce Labs Backpack";
}

pub mod accounts {
    pub const STANDARD_USER: &str = "standard_user";
    pub const LOCKED_OUT_USER: &str = "locked_out_user";
    pub const PASSWORD: &str = "secret_sauce";
}

/// Inventory id of the Sauce Labs Backpack
pub const BACKPACK_ID: u32 = 4;

/// Configuration for the target site
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub base_url: String,

    /// Probe the base URL once before running a suite
    pub probe: bool,

    /// Timeout for the reachability probe
    pub probe_timeout: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            probe: true,
            probe_timeout: Duration::from_secs(10),
        }
    }
}

/// Resolved base URL of the site under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    base: Url,
}

impl Site {
    pub fn new(base_url: &str) -> E2eResult<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| E2eError::InvalidConfig(format!("base URL {:?}: {}", base_url, e)))?;

        if base.cannot_be_a_base() {
            return Err(E2eError::InvalidConfig(format!(
                "base URL {:?} cannot have paths",
                base_url
            )));
        }

        // Joining relative paths needs the trailing slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { base })
    }

    /// URL of the site root
    pub fn root_url(&self) -> &str {
        self.base.as_str()
    }

    /// Absolute URL for a path relative to the root
    pub fn url(&self, path: &str) -> E2eResult<String> {
        self.base
            .join(path.trim_start_matches('/'))
            .map(String::from)
            .map_err(|e| E2eError::InvalidConfig(format!("path {:?}: {}", path, e)))
    }

    /// Issue a single GET against the root; no retries
    pub async fn probe(&self, timeout: Duration) -> E2eResult<()> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        match client.get(self.base.clone()).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("Site reachable at {}", self.base);
                Ok(())
            }
            Ok(resp) => {
                warn!("Probe of {} returned {}", self.base, resp.status());
                Err(E2eError::Unreachable(format!(
                    "{} returned {}",
                    self.base,
                    resp.status()
                )))
            }
            Err(e) => Err(E2eError::Unreachable(format!("{}: {}", self.base, e))),
        }
    }
}
