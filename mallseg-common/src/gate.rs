//! Operator access gate
//!
//! A stub: one static username/password pair compared in plain text. No
//! hashing, no rate limiting, no sessions. Swap in another `AccessGate`
//! implementation to change that without touching request handling.

/// Decides whether an operator may see the dashboard
pub trait AccessGate: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

pub const DEFAULT_USERNAME: &str = "mallowner";
pub const DEFAULT_PASSWORD: &str = "password";

/// Fixed credential pair compiled into the binary
#[derive(Debug, Clone)]
pub struct StaticCredentialGate {
    username: String,
    password: String,
}

impl StaticCredentialGate {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for StaticCredentialGate {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl AccessGate for StaticCredentialGate {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}
