use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Counters for the order pipeline:
// - creations and creation failures (by reason)
// - lookups (by outcome) and listings
//
// All metrics are registered with one Registry and scraped via /metrics.
//
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub orders_created: IntCounter,
    pub order_create_failures: IntCounterVec,
    pub order_lookups: IntCounterVec,
    pub order_lists: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_created = IntCounter::new(
            "orders_created_total",
            "Total orders successfully created",
        )?;
        registry.register(Box::new(orders_created.clone()))?;

        let order_create_failures = IntCounterVec::new(
            Opts::new(
                "order_create_failures_total",
                "Order creations rejected or failed",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(order_create_failures.clone()))?;

        let order_lookups = IntCounterVec::new(
            Opts::new("order_lookups_total", "Single-order fetches by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(order_lookups.clone()))?;

        let order_lists = IntCounter::new(
            "order_lists_total",
            "Total list-all-orders requests served",
        )?;
        registry.register(Box::new(order_lists.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            order_create_failures,
            order_lookups,
            order_lists,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_order_created(&self) {
        self.orders_created.inc();
    }

    pub fn record_create_failure(&self, reason: &str) {
        self.order_create_failures.with_label_values(&[reason]).inc();
    }

    pub fn record_lookup(&self, outcome: &str) {
        self.order_lookups.with_label_values(&[outcome]).inc();
    }

    pub fn record_list(&self) {
        self.order_lists.inc();
    }
}
