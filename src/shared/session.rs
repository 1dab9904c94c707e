//! Session gate and screen navigation.
//!
//! Credentials are only checked for presence. Nothing is persisted or
//! verified against any authority; a successful login is purely a screen
//! transition.

use tracing::info;

use crate::error::Alert;

/// Message shown after a successful registration
pub const ACCOUNT_CREATED: &str = "Account created!";

/// Validation errors raised by the login and registration forms
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Please enter both username and password")]
    MissingCredentials,

    #[error("Please fill in all fields")]
    IncompleteRegistration,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl SessionError {
    /// Blocking alert for this validation error
    pub fn to_alert(&self) -> Alert {
        Alert::error(self.to_string())
    }
}

/// Validate the login form
pub fn validate_login(username: &str, password: &str) -> Result<(), SessionError> {
    if username.is_empty() || password.is_empty() {
        return Err(SessionError::MissingCredentials);
    }
    Ok(())
}

/// Validate the registration form
///
/// Checks run in order: every field present, then password confirmation.
pub fn validate_registration(
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), SessionError> {
    if username.is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(SessionError::IncompleteRegistration);
    }

    if password != confirm_password {
        return Err(SessionError::PasswordMismatch);
    }

    Ok(())
}

/// Screens of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Register,
    Dashboard,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Register => "Register",
            Screen::Dashboard => "PlantHabitat",
        }
    }
}

/// Stack-based navigator starting at the Login screen
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Screen::Login],
        }
    }

    /// Screen currently shown
    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::Login)
    }

    /// Number of screens on the stack
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Go to a screen; if it is already on the stack, pop back to it
    pub fn navigate(&mut self, screen: Screen) {
        if let Some(pos) = self.stack.iter().rposition(|s| *s == screen) {
            self.stack.truncate(pos + 1);
        } else {
            self.stack.push(screen);
        }
        info!(screen = ?screen, depth = self.stack.len(), "Navigated");
    }

    /// Replace the current screen without growing the stack
    ///
    /// If the screen below is the same one, the two collapse into it, so
    /// repeated login/logout cycles leave a single Login on the stack.
    pub fn replace(&mut self, screen: Screen) {
        self.stack.pop();
        if self.stack.last() != Some(&screen) {
            self.stack.push(screen);
        }
        info!(screen = ?screen, depth = self.stack.len(), "Replaced screen");
    }

    /// Pop the current screen; the root screen is never popped
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Submit the login form; navigates to the Dashboard on success
    pub fn submit_login(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        validate_login(username, password)?;
        info!(username = %username, "Login accepted");
        self.navigate(Screen::Dashboard);
        Ok(())
    }

    /// Submit the registration form; returns to Login with a success alert
    pub fn submit_registration(
        &mut self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Alert, SessionError> {
        validate_registration(username, password, confirm_password)?;
        info!(username = %username, "Registration accepted");
        self.navigate(Screen::Login);
        Ok(Alert::success(ACCOUNT_CREATED))
    }

    /// Leave the Dashboard for Login
    pub fn logout(&mut self) {
        self.replace(Screen::Login);
    }
}
