use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub driver_rankings_total: IntCounter,
    pub garage_searches_total: IntCounterVec,
    pub assignments_total: IntCounterVec,
    pub onboarding_corrections_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let driver_rankings_total = IntCounter::new(
            "driver_rankings_total",
            "Total driver candidate rankings served",
        )
        .expect("valid driver_rankings_total metric");

        let garage_searches_total = IntCounterVec::new(
            Opts::new("garage_searches_total", "Garage searches by sort order"),
            &["sort"],
        )
        .expect("valid garage_searches_total metric");

        let assignments_total = IntCounterVec::new(
            Opts::new("assignments_total", "Job assignment attempts by outcome"),
            &["outcome"],
        )
        .expect("valid assignments_total metric");

        let onboarding_corrections_total = IntCounterVec::new(
            Opts::new(
                "onboarding_corrections_total",
                "Silent onboarding record corrections by kind",
            ),
            &["kind"],
        )
        .expect("valid onboarding_corrections_total metric");

        registry
            .register(Box::new(driver_rankings_total.clone()))
            .expect("register driver_rankings_total");
        registry
            .register(Box::new(garage_searches_total.clone()))
            .expect("register garage_searches_total");
        registry
            .register(Box::new(assignments_total.clone()))
            .expect("register assignments_total");
        registry
            .register(Box::new(onboarding_corrections_total.clone()))
            .expect("register onboarding_corrections_total");

        Self {
            registry,
            driver_rankings_total,
            garage_searches_total,
            assignments_total,
            onboarding_corrections_total,
        }
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
