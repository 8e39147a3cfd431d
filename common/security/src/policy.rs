use crate::{roles::{ensure_any_role, Role}, SecurityError, SessionUser};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CatalogView,
    SalesProcess,
    InventoryView,
    ReportsView,
    SettingsWrite,
    UserAdmin,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::CatalogView => "catalog_view",
            Capability::SalesProcess => "sales_process",
            Capability::InventoryView => "inventory_view",
            Capability::ReportsView => "reports_view",
            Capability::SettingsWrite => "settings_write",
            Capability::UserAdmin => "user_admin",
        }
    }
}

// Simple mapping: which roles are allowed each capability.
fn allowed_roles(cap: Capability) -> &'static [Role] {
    use Capability::*;
    use Role::*;
    match cap {
        CatalogView => &[Admin, Manager, Clerk],
        SalesProcess => &[Admin, Manager, Clerk],
        InventoryView => &[Admin, Manager, Clerk],
        ReportsView => &[Admin, Manager],
        SettingsWrite => &[Admin, Manager],
        UserAdmin => &[Admin],
    }
}

pub fn ensure_capability(user: &SessionUser, cap: Capability) -> Result<(), SecurityError> {
    ensure_any_role(user, allowed_roles(cap)).inspect_err(|_| {
        warn!(username = %user.username, role = %user.role, capability = cap.as_str(), "capability_check_failed");
    })
}
