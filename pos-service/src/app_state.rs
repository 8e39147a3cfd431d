use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use common_catalog::{sample_products, Product};
use common_http_errors::ApiError;
use common_observability::PosMetrics;
use common_security::UserDirectory;

use crate::config::ServiceConfig;
use crate::session::Session;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub catalog: Arc<Vec<Product>>,
    pub users: Arc<UserDirectory>,
    pub metrics: Arc<PosMetrics>,
    pub(crate) session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(config: ServiceConfig, catalog: Vec<Product>, users: UserDirectory) -> Self {
        let session = Session::new(&config);
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            users: Arc::new(users),
            metrics: Arc::new(PosMetrics::new()),
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Demo catalog and the seeded user table.
    pub fn with_demo_data(config: ServiceConfig) -> Self {
        Self::new(config, sample_products(), UserDirectory::seeded())
    }

    pub(crate) fn session(&self) -> Result<MutexGuard<'_, Session>, ApiError> {
        self.session.lock().map_err(|e| ApiError::internal(e, None))
    }

    pub(crate) fn product(&self, product_id: i64) -> Option<&Product> {
        self.catalog.iter().find(|p| p.id == product_id)
    }
}

impl FromRef<AppState> for Arc<PosMetrics> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}
