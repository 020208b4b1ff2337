//! Session establishment before any catalog work.
//!
//! The catalog is only visible to a signed-in member. The login form is a
//! two-step flow: the e-mail is submitted first, then the password form
//! replaces it on the same page.

use anyhow::{Result, anyhow};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use super::BrowserDriver;
use crate::crawl_engine::page_timeout::{settle, with_page_timeout};
use crate::utils::{
    DEFAULT_CONTROL_TIMEOUT_SECS, DEFAULT_PAGE_LOAD_TIMEOUT_SECS, DEFAULT_READINESS_TIMEOUT_SECS,
    DEFAULT_REDIRECT_SETTLE_MS,
};

/// Produces an authenticated browsing session on the driver's focused tab.
#[allow(async_fn_in_trait)]
pub trait SessionProvider {
    async fn establish<D: BrowserDriver>(&self, driver: &D) -> Result<()>;
}

/// For catalogs that need no sign-in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLogin;

impl SessionProvider for NoLogin {
    async fn establish<D: BrowserDriver>(&self, _driver: &D) -> Result<()> {
        debug!("No login configured, continuing with anonymous session");
        Ok(())
    }
}

#[derive(Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Selectors of the two-step login form.
#[derive(Debug, Clone)]
pub struct LoginSelectors {
    pub email_input: String,
    pub email_submit: String,
    pub password_input: String,
    pub password_submit: String,
}

impl Default for LoginSelectors {
    fn default() -> Self {
        Self {
            email_input: "#email_email".to_string(),
            email_submit: "button[type='submit'][form='registration-form-login']".to_string(),
            password_input: "#login_password".to_string(),
            password_submit: "button[type='submit'][form='registration-form']".to_string(),
        }
    }
}

/// E-mail then password form login.
///
/// Success is judged by the landing URL: the site keeps the browser on a
/// `login` URL when credentials are rejected.
#[derive(Debug, Clone)]
pub struct FormLogin {
    login_url: String,
    credentials: LoginCredentials,
    selectors: LoginSelectors,
    page_load_timeout: Duration,
    readiness_timeout: Duration,
    control_timeout: Duration,
    submit_settle: Duration,
}

impl FormLogin {
    pub fn new(login_url: impl Into<String>, credentials: LoginCredentials) -> Self {
        Self {
            login_url: login_url.into(),
            credentials,
            selectors: LoginSelectors::default(),
            page_load_timeout: Duration::from_secs(DEFAULT_PAGE_LOAD_TIMEOUT_SECS),
            readiness_timeout: Duration::from_secs(DEFAULT_READINESS_TIMEOUT_SECS),
            control_timeout: Duration::from_secs(DEFAULT_CONTROL_TIMEOUT_SECS),
            submit_settle: Duration::from_millis(DEFAULT_REDIRECT_SETTLE_MS),
        }
    }

    #[must_use]
    pub fn with_selectors(mut self, selectors: LoginSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    /// Override every wait at once; tests use `Duration::ZERO`.
    #[must_use]
    pub fn with_timeouts(mut self, control_timeout: Duration, submit_settle: Duration) -> Self {
        self.readiness_timeout = control_timeout;
        self.control_timeout = control_timeout;
        self.submit_settle = submit_settle;
        self
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    async fn fill_and_submit<D: BrowserDriver>(
        &self,
        driver: &D,
        input_selector: &str,
        value: &str,
        submit_selector: &str,
    ) -> Result<()> {
        let input = driver
            .wait_for_actionable(input_selector, self.control_timeout)
            .await
            .ok_or_else(|| anyhow!("Login field '{input_selector}' never became usable"))?;
        driver.fill(&input, value).await?;

        let submit = driver
            .wait_for_actionable(submit_selector, self.control_timeout)
            .await
            .ok_or_else(|| anyhow!("Login button '{submit_selector}' never became usable"))?;
        driver.click(&submit).await?;
        settle(self.submit_settle).await;
        Ok(())
    }
}

impl SessionProvider for FormLogin {
    async fn establish<D: BrowserDriver>(&self, driver: &D) -> Result<()> {
        info!("Signing in at {}", self.login_url);

        with_page_timeout(
            driver.navigate(&self.login_url),
            self.page_load_timeout,
            "Login page navigation",
        )
        .await?;

        if !driver.wait_for_ready(self.readiness_timeout).await {
            debug!("Login page not reported ready, continuing with current DOM");
        }

        self.fill_and_submit(
            driver,
            &self.selectors.email_input,
            &self.credentials.email,
            &self.selectors.email_submit,
        )
        .await?;

        self.fill_and_submit(
            driver,
            &self.selectors.password_input,
            &self.credentials.password,
            &self.selectors.password_submit,
        )
        .await?;

        let landing = driver.current_url().await?;
        if landing.contains("login") {
            return Err(anyhow!("Login rejected, still on {landing}"));
        }

        info!("Signed in as {}", self.credentials.email);
        Ok(())
    }
}
