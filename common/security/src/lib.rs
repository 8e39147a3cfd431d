pub mod directory;
pub mod error;
pub mod policy;
pub mod roles;

pub use directory::{authenticate, SessionUser, UserAccount, UserDirectory, DEMO_ADMIN_PASSWORD, DEMO_ADMIN_USERNAME};
pub use error::SecurityError;
pub use policy::{ensure_capability, Capability};
pub use roles::{ensure_any_role, Role};
