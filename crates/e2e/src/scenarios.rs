//! The storefront scenarios
//!
//! Each procedure receives a fresh session from the runner, drives it, and
//! returns the first failure it observes. None of them close the session.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::E2eResult;
use crate::pages::LoginPage;
use crate::scenario::Scenario;
use crate::session::Session;
use crate::site::{accounts, copy, paths, selectors, BACKPACK_ID};

/// Customer details entered at checkout
pub const CUSTOMER_FIRST_NAME: &str = "John";
pub const CUSTOMER_LAST_NAME: &str = "Doe";
pub const CUSTOMER_POSTAL_CODE: &str = "12345";

static SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "homepage_loads",
        description: "Root page loads with the store title",
        tags: &["smoke"],
        run: homepage_loads,
    },
    Scenario {
        name: "successful_login",
        description: "Standard user lands on the inventory",
        tags: &["smoke", "auth"],
        run: successful_login,
    },
    Scenario {
        name: "login_with_empty_fields",
        description: "Submitting an empty form asks for a username",
        tags: &["auth"],
        run: login_with_empty_fields,
    },
    Scenario {
        name: "locked_out_user_login",
        description: "Locked-out account is refused",
        tags: &["auth"],
        run: locked_out_user_login,
    },
    Scenario {
        name: "burger_menu_opens",
        description: "Menu panel becomes visible after clicking the burger button",
        tags: &["menu"],
        run: burger_menu_opens,
    },
    Scenario {
        name: "open_product_detail",
        description: "Item title link opens the product page",
        tags: &["catalog"],
        run: open_product_detail,
    },
    Scenario {
        name: "add_item_to_cart",
        description: "Backpack added from its product page shows in the cart",
        tags: &["cart"],
        run: add_item_to_cart,
    },
    Scenario {
        name: "remove_item_from_cart",
        description: "Removing the backpack empties the cart",
        tags: &["cart"],
        run: remove_item_from_cart,
    },
    Scenario {
        name: "full_checkout",
        description: "Cart checks out through to the confirmation page",
        tags: &["cart", "checkout"],
        run: full_checkout,
    },
    Scenario {
        name: "logout",
        description: "Logging out returns to the login page",
        tags: &["auth", "menu"],
        run: logout,
    },
];

/// Every scenario, in a stable order
pub fn all() -> &'static [Scenario] {
    SCENARIOS
}

pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.name == name)
}

pub fn tagged(tag: &str) -> Vec<Scenario> {
    SCENARIOS.iter().filter(|s| s.has_tag(tag)).copied().collect()
}

async fn login_as(session: &mut Session, username: &str, password: &str) -> E2eResult<()> {
    let mut page = LoginPage::new(session);
    page.navigate().await?;
    page.login(username, password).await
}

async fn login_as_standard_user(session: &mut Session) -> E2eResult<()> {
    login_as(session, accounts::STANDARD_USER, accounts::PASSWORD).await
}

/// Log in, add the backpack from its product page, and open the cart
async fn backpack_in_cart(session: &mut Session) -> E2eResult<()> {
    login_as_standard_user(session).await?;
    session.click(&selectors::item_title_link(BACKPACK_ID)).await?;
    session.click(selectors::ADD_TO_CART).await?;
    session.open(paths::CART).await
}

fn homepage_loads(session: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let root = session.site().root_url().to_string();
        session.goto(&root).await?;
        session.expect_title(copy::TITLE).await
    }
    .boxed()
}

fn successful_login(session: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        login_as_standard_user(session).await?;
        session.expect_path(paths::INVENTORY).await
    }
    .boxed()
}

fn login_with_empty_fields(session: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        login_as(session, "", "").await?;
        session.expect_visible(selectors::ERROR_BANNER).await?;
        session
            .expect_text(selectors::ERROR_BANNER, copy::USERNAME_REQUIRED)
            .await?;

        let root = session.site().root_url().to_string();
        session.expect_url(&root).await
    }
    .boxed()
}

fn locked_out_user_login(session: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        login_as(session, accounts::LOCKED_OUT_USER, accounts::PASSWORD).await?;
        session.expect_visible(selectors::ERROR_BANNER).await?;
        session
            .expect_text(selectors::ERROR_BANNER, copy::LOCKED_OUT)
            .await?;

        let root = session.site().root_url().to_string();
        session.expect_url(&root).await
    }
    .boxed()
}

fn burger_menu_opens(session: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        login_as_standard_user(session).await?;
        session.click(selectors::MENU_BUTTON).await?;
        session
            .expect_attribute(selectors::MENU_PANEL, "aria-hidden", "false")
            .await
    }
    .boxed()
}

fn open_product_detail(session: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        login_as_standard_user(session).await?;
        session.click(&selectors::item_title_link(BACKPACK_ID)).await?;
        session
            .expect_path(&paths::inventory_item(BACKPACK_ID))
            .await
    }
    .boxed()
}

fn add_item_to_cart(session: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        backpack_in_cart(session).await?;
        session.expect_count(selectors::CART_ITEM, 1).await?;
        session
            .expect_text(selectors::CART_ITEM_NAME, copy::BACKPACK)
            .await
    }
    .boxed()
}

fn remove_item_from_cart(session: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        backpack_in_cart(session).await?;
        session.expect_visible(selectors::CART_ITEM).await?;
        session.click(selectors::REMOVE_BACKPACK).await?;
        session.expect_hidden(selectors::CART_ITEM).await?;
        session.expect_count(selectors::CART_ITEM, 0).await
    }
    .boxed()
}

fn full_checkout(session: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        backpack_in_cart(session).await?;
        session.click(selectors::CHECKOUT).await?;
        session
            .fill(selectors::FIRST_NAME, CUSTOMER_FIRST_NAME)
            .await?;
        session.fill(selectors::LAST_NAME, CUSTOMER_LAST_NAME).await?;
        session
            .fill(selectors::POSTAL_CODE, CUSTOMER_POSTAL_CODE)
            .await?;
        session.click(selectors::CONTINUE).await?;
        session.click(selectors::FINISH).await?;
        session.expect_visible(selectors::COMPLETE_HEADER).await?;
        session
            .expect_text(selectors::COMPLETE_HEADER, copy::ORDER_COMPLETE)
            .await
    }
    .boxed()
}

fn logout(session: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        login_as_standard_user(session).await?;
        session.click(selectors::MENU_BUTTON).await?;
        session.click(selectors::LOGOUT_LINK).await?;

        let root = session.site().root_url().to_string();
        session.expect_url(&root).await
    }
    .boxed()
}
