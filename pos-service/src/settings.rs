use common_http_errors::ApiError;
use common_money::{MoneyError, TaxRate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ServiceConfig, SUPPORTED_CURRENCIES};

/// Store settings editable at runtime. Seeded from [`ServiceConfig`] and lost on restart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub business_name: String,
    pub currency: String,
    pub tax_rate: TaxRate,
    pub low_stock_alert: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsUpdate {
    pub business_name: Option<String>,
    pub currency: Option<String>,
    pub tax_rate: Option<f64>,
    pub low_stock_alert: Option<bool>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("business name cannot be blank")]
    BlankBusinessName,
    #[error("unsupported currency {0}")]
    UnsupportedCurrency(String),
    #[error(transparent)]
    TaxRate(#[from] MoneyError),
}

impl From<SettingsError> for ApiError {
    fn from(e: SettingsError) -> Self {
        let code = match e {
            SettingsError::BlankBusinessName => "blank_business_name",
            SettingsError::UnsupportedCurrency(_) => "unsupported_currency",
            SettingsError::TaxRate(_) => "invalid_tax_rate",
        };
        ApiError::bad_request(code, e.to_string())
    }
}

impl Settings {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            business_name: config.business_name.clone(),
            currency: config.currency.clone(),
            tax_rate: config.default_tax_rate.clone(),
            low_stock_alert: true,
        }
    }

    /// Validates every field before touching any, so a rejected update changes nothing.
    pub fn apply(&mut self, update: SettingsUpdate) -> Result<(), SettingsError> {
        let business_name = match update.business_name {
            Some(name) if name.trim().is_empty() => return Err(SettingsError::BlankBusinessName),
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };
        let currency = match update.currency {
            Some(c) => {
                let c = c.trim().to_ascii_uppercase();
                if !SUPPORTED_CURRENCIES.contains(&c.as_str()) {
                    return Err(SettingsError::UnsupportedCurrency(c));
                }
                Some(c)
            }
            None => None,
        };
        let tax_rate = update.tax_rate.map(TaxRate::from_percent).transpose()?;

        if let Some(name) = business_name {
            self.business_name = name;
        }
        if let Some(c) = currency {
            self.currency = c;
        }
        if let Some(rate) = tax_rate {
            self.tax_rate = rate;
        }
        if let Some(flag) = update.low_stock_alert {
            self.low_stock_alert = flag;
        }
        Ok(())
    }
}
