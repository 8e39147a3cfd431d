use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common_http_errors::ApiError;
use common_security::{ensure_capability, Capability, SecurityError, SessionUser};

use crate::app_state::AppState;
use crate::cart::Cart;
use crate::config::ServiceConfig;
use crate::receipt::Receipt;
use crate::settings::Settings;

/// The one interactive session this terminal serves.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: Option<SessionUser>,
    pub cart: Cart,
    pub last_receipt: Option<Receipt>,
    pub settings: Settings,
}

impl Session {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            user: None,
            cart: Cart::default(),
            last_receipt: None,
            settings: Settings::from_config(config),
        }
    }

    pub fn sign_in(&mut self, user: SessionUser) {
        self.user = Some(user);
    }

    /// Drops the identity only. Cart and last receipt survive a logout.
    pub fn sign_out(&mut self) -> Option<SessionUser> {
        self.user.take()
    }
}

/// Extracts the signed-in user or rejects with 401 `not_authenticated`.
pub struct AuthSession(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = state.session()?.user.clone();
        user.map(AuthSession).ok_or_else(|| SecurityError::NotAuthenticated.into())
    }
}

impl AuthSession {
    pub fn require(&self, cap: Capability) -> Result<&SessionUser, ApiError> {
        ensure_capability(&self.0, cap)
            .map(|_| &self.0)
            .map_err(|_| ApiError::ForbiddenMissingCapability { capability: cap.as_str(), trace_id: None })
    }
}
