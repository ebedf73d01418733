//! Scoped environment variables for child processes.
//!
//! An overlay is applied to a single `Command`; the parent's environment is
//! never touched. Values are zeroized on drop and masked in `Debug`.

use tokio::process::Command;
use zeroize::Zeroizing;

/// Variables added on top of the inherited environment of one child process.
#[derive(Clone, Default)]
pub struct EnvOverlay {
    vars: Vec<(String, Zeroizing<String>)>,
}

impl EnvOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.vars.retain(|(k, _)| *k != key);
        self.vars.push((key, Zeroizing::new(value.into())));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Variable names, safe to log.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|(k, _)| k.as_str())
    }

    /// Apply the overlay to a command.
    pub fn apply(&self, command: &mut Command) {
        for (key, value) in &self.vars {
            command.env(key, value.as_str());
        }
    }
}

impl std::fmt::Debug for EnvOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.vars.iter().map(|(k, _)| (k, "****")))
            .finish()
    }
}
