use std::fmt;
use std::sync::Arc;

use service::store::CoasterStore;

pub const ADMIN_USER: &str = "admin";

/// Static admin login, fixed for the lifetime of the process.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(password: impl Into<String>) -> Self {
        Self { username: ADMIN_USER.to_string(), password: password.into() }
    }

    /// Both parts must match; callers learn nothing about which one failed.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = self.username == username;
        let pass_ok = self.password == password;
        user_ok & pass_ok
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Shared handler state: the coaster store plus the admin login.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CoasterStore>,
    pub admin: Arc<AdminCredentials>,
}

impl AppState {
    pub fn new(store: Arc<dyn CoasterStore>, admin: AdminCredentials) -> Self {
        Self { store, admin: Arc::new(admin) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_requires_both_user_and_password() {
        let creds = AdminCredentials::new("hunter2");
        assert!(creds.verify("admin", "hunter2"));
        assert!(!creds.verify("admin", "hunter3"));
        assert!(!creds.verify("root", "hunter2"));
        assert!(!creds.verify("", ""));
    }

    #[test]
    fn debug_output_hides_password() {
        let out = format!("{:?}", AdminCredentials::new("hunter2"));
        assert!(out.contains("admin"));
        assert!(!out.contains("hunter2"));
    }
}
