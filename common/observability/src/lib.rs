use prometheus::{Encoder, Histogram, IntCounter, IntCounterVec, Registry, TextEncoder};

#[derive(Clone)]
pub struct PosMetrics {
    pub registry: Registry,
    pub login_attempts_total: IntCounterVec,
    pub sales_completed_total: IntCounter,
    pub cart_rejections_total: IntCounterVec,
    pub catalog_sort_duration_seconds: Histogram,
    pub http_errors_total: IntCounterVec,
}

impl PosMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let login_attempts_total = IntCounterVec::new(
            prometheus::Opts::new("pos_login_attempts_total", "Login attempts by outcome"),
            &["outcome"],
        ).unwrap();
        let sales_completed_total = IntCounter::new(
            "pos_sales_completed_total",
            "Completed sales (receipts issued)",
        ).unwrap();
        let cart_rejections_total = IntCounterVec::new(
            prometheus::Opts::new("pos_cart_rejections_total", "Cart additions refused, by reason"),
            &["reason"],
        ).unwrap();
        let catalog_sort_duration_seconds = Histogram::with_opts(
            prometheus::HistogramOpts::new(
                "pos_catalog_sort_duration_seconds",
                "Time spent filtering, sorting and classifying one product view"
            ).buckets(vec![0.00001, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05])
        ).unwrap();
        let http_errors_total = IntCounterVec::new(
            prometheus::Opts::new(
                "http_errors_total",
                "Count of HTTP error responses emitted (status >= 400)"
            ),
            &["service", "code", "status"]
        ).unwrap();
        let _ = registry.register(Box::new(login_attempts_total.clone()));
        let _ = registry.register(Box::new(sales_completed_total.clone()));
        let _ = registry.register(Box::new(cart_rejections_total.clone()));
        let _ = registry.register(Box::new(catalog_sort_duration_seconds.clone()));
        let _ = registry.register(Box::new(http_errors_total.clone()));
        PosMetrics { registry, login_attempts_total, sales_completed_total, cart_rejections_total, catalog_sort_duration_seconds, http_errors_total }
    }

    /// Prometheus text exposition of every registered family.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Default for PosMetrics {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        let metrics = PosMetrics::new();
        metrics.sales_completed_total.inc();
        metrics.login_attempts_total.with_label_values(&["failure"]).inc();
        let text = metrics.render().unwrap();
        assert!(text.contains("pos_sales_completed_total 1"));
        assert!(text.contains("pos_login_attempts_total{outcome=\"failure\"} 1"));
    }

    #[test]
    fn instances_do_not_share_state() {
        let a = PosMetrics::new();
        let b = PosMetrics::new();
        a.sales_completed_total.inc();
        assert_eq!(b.sales_completed_total.get(), 0);
    }
}
