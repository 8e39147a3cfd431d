use anyhow::{bail, Context};
use common_money::{TaxRate, DEFAULT_CURRENCY};
use std::env;
use std::net::{IpAddr, SocketAddr};

pub const SUPPORTED_CURRENCIES: &[&str] = &["KES", "USD", "EUR", "GBP"];
pub const DEFAULT_BUSINESS_NAME: &str = "Salphine Chemos Getaway Resort";
pub const DEFAULT_PORT: u16 = 8090;
pub const DEFAULT_REPORT_SEED: u64 = 42;
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:3001", "http://localhost:5173"];

/// Startup configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Accept the built-in admin credentials when the user table has no match.
    pub demo_mode: bool,
    pub default_tax_rate: TaxRate,
    pub currency: String,
    pub business_name: String,
    pub report_seed: u64,
    pub allowed_origins: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            demo_mode: false,
            default_tax_rate: TaxRate::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            report_seed: DEFAULT_REPORT_SEED,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

fn parse_flag(name: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("{name} must be a boolean, got {other:?}"),
    }
}

impl ServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(host) = lookup("HOST") {
            cfg.host = host.parse().with_context(|| format!("HOST is not an IP address: {host}"))?;
        }
        if let Some(port) = lookup("PORT") {
            cfg.port = port.parse().with_context(|| format!("PORT is not a valid port: {port}"))?;
        }
        if let Some(flag) = lookup("POS_DEMO_MODE") {
            cfg.demo_mode = parse_flag("POS_DEMO_MODE", &flag)?;
        }
        if let Some(rate) = lookup("POS_TAX_RATE") {
            let percent: f64 = rate.parse().with_context(|| format!("POS_TAX_RATE is not a number: {rate}"))?;
            cfg.default_tax_rate = TaxRate::from_percent(percent).context("POS_TAX_RATE")?;
        }
        if let Some(currency) = lookup("POS_CURRENCY") {
            let currency = currency.trim().to_ascii_uppercase();
            if !SUPPORTED_CURRENCIES.contains(&currency.as_str()) {
                bail!("POS_CURRENCY {currency} not one of {SUPPORTED_CURRENCIES:?}");
            }
            cfg.currency = currency;
        }
        if let Some(name) = lookup("POS_BUSINESS_NAME").filter(|n| !n.trim().is_empty()) {
            cfg.business_name = name.trim().to_string();
        }
        if let Some(seed) = lookup("POS_REPORT_SEED") {
            cfg.report_seed = seed.parse().with_context(|| format!("POS_REPORT_SEED is not an integer: {seed}"))?;
        }
        if let Some(origins) = lookup("POS_ALLOWED_ORIGINS") {
            cfg.allowed_origins = origins
                .split(',')
                .map(|o| o.trim())
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(cfg)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}
