use prometheus::{Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub backend_requests_total: IntCounterVec,
    pub backend_request_seconds: HistogramVec,
    pub view_renders_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let backend_requests_total = IntCounterVec::new(
            Opts::new(
                "backend_requests_total",
                "Parcel backend requests by operation and outcome",
            ),
            &["operation", "outcome"],
        )
        .expect("valid backend_requests_total metric");

        let backend_request_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "backend_request_seconds",
                "Latency of parcel backend requests in seconds",
            ),
            &["operation"],
        )
        .expect("valid backend_request_seconds metric");

        let view_renders_total = IntCounterVec::new(
            Opts::new("view_renders_total", "View models rendered by screen"),
            &["view"],
        )
        .expect("valid view_renders_total metric");

        registry
            .register(Box::new(backend_requests_total.clone()))
            .expect("register backend_requests_total");
        registry
            .register(Box::new(backend_request_seconds.clone()))
            .expect("register backend_request_seconds");
        registry
            .register(Box::new(view_renders_total.clone()))
            .expect("register view_renders_total");

        Self {
            registry,
            backend_requests_total,
            backend_request_seconds,
            view_renders_total,
        }
    }

    pub fn record_backend_call(&self, operation: &str, outcome: &str, elapsed_secs: f64) {
        self.backend_requests_total
            .with_label_values(&[operation, outcome])
            .inc();
        self.backend_request_seconds
            .with_label_values(&[operation])
            .observe(elapsed_secs);
    }

    pub fn record_render(&self, view: &str) {
        self.view_renders_total.with_label_values(&[view]).inc();
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
