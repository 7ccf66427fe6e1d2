//! External-account linking flow.
//!
//! `Select → Credentials → Verifying → Success`. The flow is a simulation:
//! the verification always succeeds and the linked-account list of the
//! ledger is left as it is.

use std::time::Duration;

use crate::{EngineError, ResultEngine, Scheduler};

pub const INSTITUTIONS: [&str; 8] = [
    "Chase",
    "Bank of America",
    "Wells Fargo",
    "Citi",
    "American Express",
    "Fidelity",
    "Charles Schwab",
    "Vanguard",
];

const VERIFY_DELAY: Duration = Duration::from_millis(2500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStep {
    Select,
    Credentials,
    Verifying,
    Success,
}

/// Fires when the institution finished checking the credentials.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkTimer {
    pub attempt: u64,
}

#[derive(Debug)]
pub struct LinkAccountWizard {
    step: LinkStep,
    search: String,
    institution: Option<&'static str>,
    pub username: String,
    pub password: String,
    attempt: u64,
}

impl Default for LinkAccountWizard {
    fn default() -> Self {
        Self {
            step: LinkStep::Select,
            search: String::new(),
            institution: None,
            username: String::new(),
            password: String::new(),
            attempt: 0,
        }
    }
}

impl LinkAccountWizard {
    pub fn step(&self) -> LinkStep {
        self.step
    }

    pub fn institution(&self) -> Option<&'static str> {
        self.institution
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Institutions whose name contains the search text, ignoring case.
    pub fn matching_institutions(&self) -> Vec<&'static str> {
        let needle = self.search.trim().to_lowercase();
        INSTITUTIONS
            .iter()
            .copied()
            .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn select(&mut self, institution: &str) -> ResultEngine<()> {
        if self.step != LinkStep::Select {
            return Err(EngineError::InvalidState(
                "institution already selected".to_string(),
            ));
        }
        let name = INSTITUTIONS
            .iter()
            .copied()
            .find(|name| *name == institution)
            .ok_or_else(|| EngineError::KeyNotFound(institution.to_string()))?;
        self.institution = Some(name);
        self.step = LinkStep::Credentials;
        Ok(())
    }

    /// Back to the institution list; only while entering credentials.
    pub fn back(&mut self) {
        if self.step == LinkStep::Credentials {
            self.step = LinkStep::Select;
            self.institution = None;
            self.username.clear();
            self.password.clear();
        }
    }

    pub fn can_submit(&self) -> bool {
        self.step == LinkStep::Credentials
            && !self.username.trim().is_empty()
            && !self.password.trim().is_empty()
    }

    pub fn submit(&mut self, scheduler: &mut dyn Scheduler<LinkTimer>) -> ResultEngine<()> {
        if self.step != LinkStep::Credentials {
            return Err(EngineError::InvalidState(
                "no institution selected".to_string(),
            ));
        }
        if !self.can_submit() {
            return Err(EngineError::InvalidCredentials);
        }
        self.attempt += 1;
        self.step = LinkStep::Verifying;
        scheduler.schedule(VERIFY_DELAY, LinkTimer { attempt: self.attempt });
        tracing::debug!(institution = ?self.institution, "linking external account");
        Ok(())
    }

    pub fn on_timer(&mut self, timer: LinkTimer) {
        if timer.attempt == self.attempt && self.step == LinkStep::Verifying {
            self.step = LinkStep::Success;
            tracing::info!(institution = ?self.institution, "external account linked");
        }
    }
}
