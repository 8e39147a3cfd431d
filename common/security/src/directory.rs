//! Demo user table and the login check against it.
//!
//! Passwords are stored and compared in the clear. This is a demo credential
//! table, not an authentication system.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{Role, SecurityError};

pub const DEMO_ADMIN_USERNAME: &str = "admin";
pub const DEMO_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub email: Option<String>,
    pub is_active: bool,
}

/// The identity attached to the active session after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub email: Option<String>,
}

impl From<&UserAccount> for SessionUser {
    fn from(account: &UserAccount) -> Self {
        Self {
            user_id: account.id,
            username: account.username.clone(),
            role: account.role,
            email: account.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    accounts: Vec<UserAccount>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// admin / manager1 / clerk1 with their demo passwords.
    pub fn seeded() -> Self {
        let mut dir = Self::new();
        dir.insert(UserAccount {
            id: 1,
            username: DEMO_ADMIN_USERNAME.into(),
            password: DEMO_ADMIN_PASSWORD.into(),
            role: Role::Admin,
            email: Some("admin@system.com".into()),
            is_active: true,
        });
        dir.insert(UserAccount {
            id: 2,
            username: "manager1".into(),
            password: "manager123".into(),
            role: Role::Manager,
            email: Some("manager@system.com".into()),
            is_active: true,
        });
        dir.insert(UserAccount {
            id: 3,
            username: "clerk1".into(),
            password: "clerk123".into(),
            role: Role::Clerk,
            email: Some("clerk@system.com".into()),
            is_active: true,
        });
        dir
    }

    /// Adds or replaces the account with the same username.
    pub fn insert(&mut self, account: UserAccount) {
        match self.accounts.iter_mut().find(|a| a.username == account.username) {
            Some(existing) => *existing = account,
            None => self.accounts.push(account),
        }
    }

    pub fn accounts(&self) -> &[UserAccount] {
        &self.accounts
    }

    fn lookup(&self, username: &str, password: &str) -> Option<&UserAccount> {
        self.accounts
            .iter()
            .find(|a| a.is_active && a.username == username && a.password == password)
    }
}

/// Check credentials against the directory.
///
/// When the directory has no match and `demo_mode` is on, the built-in
/// `admin/admin123` pair is still accepted as the admin identity. With
/// `demo_mode` off that fallback never applies.
pub fn authenticate(
    directory: &UserDirectory,
    username: &str,
    password: &str,
    demo_mode: bool,
) -> Result<SessionUser, SecurityError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(SecurityError::MissingCredentials);
    }
    if let Some(account) = directory.lookup(username, password) {
        info!(username, role = %account.role, "login_succeeded");
        return Ok(SessionUser::from(account));
    }
    if demo_mode && username == DEMO_ADMIN_USERNAME && password == DEMO_ADMIN_PASSWORD {
        warn!(username, "login granted by demo-mode admin fallback");
        return Ok(SessionUser {
            user_id: 1,
            username: DEMO_ADMIN_USERNAME.into(),
            role: Role::Admin,
            email: None,
        });
    }
    warn!(username, "login_failed");
    Err(SecurityError::InvalidCredentials)
}
