use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{SecurityError, SessionUser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Clerk,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Clerk => "clerk",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SecurityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" | "Admin" => Ok(Role::Admin),
            "manager" | "Manager" => Ok(Role::Manager),
            "clerk" | "Clerk" => Ok(Role::Clerk),
            _ => Err(SecurityError::Forbidden),
        }
    }
}

pub fn ensure_any_role(user: &SessionUser, required: &[Role]) -> Result<(), SecurityError> {
    if required.contains(&user.role) { return Ok(()); }
    Err(SecurityError::Forbidden)
}
