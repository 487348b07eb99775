//! Page objects

use crate::error::E2eResult;
use crate::session::Session;
use crate::site::selectors;

/// The login form at the site root.
///
/// Borrows the scenario's session; it never opens or closes one. Building a
/// `LoginPage` sends nothing to the browser.
pub struct LoginPage<'s> {
    session: &'s mut Session,
    pub username_input: &'static str,
    pub password_input: &'static str,
    pub login_button: &'static str,
}

impl<'s> LoginPage<'s> {
    pub fn new(session: &'s mut Session) -> Self {
        Self {
            session,
            username_input: selectors::USERNAME_INPUT,
            password_input: selectors::PASSWORD_INPUT,
            login_button: selectors::LOGIN_BUTTON,
        }
    }

    /// Load the site root
    pub async fn navigate(&mut self) -> E2eResult<()> {
        let root = self.session.site().root_url().to_string();
        self.session.goto(&root).await
    }

    /// Fill both fields and submit. Empty strings are sent as-is.
    pub async fn login(&mut self, username: &str, password: &str) -> E2eResult<()> {
        self.session.fill(self.username_input, username).await?;
        self.session.fill(self.password_input, password).await?;
        self.session.click(self.login_button).await
    }
}
