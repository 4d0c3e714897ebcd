//! Bridge from pipeline observations to a Prometheus registry.

use super::{MetricKind, MetricSink, Observation};
use crate::Result;
use prometheus::{Gauge, GaugeVec, IntCounter, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use strum::IntoEnumIterator;

const LOG_TARGET: &str = "   metrics";

/// A per-scrape Prometheus registry.
///
/// Built fresh for every scrape so that repositories which disappear between
/// polls do not linger as stale series. The only state carried across scrapes
/// is the process-wide parse-failure counter, which is registered here by
/// handle; `prometheus` counters share their value across clones, so every
/// scrape exposes the same monotonically increasing total.
pub struct ScrapeMetrics {
    registry: Registry,
    gauges: HashMap<MetricKind, GaugeVec>,
    up: Gauge,
}

impl core::fmt::Debug for ScrapeMetrics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrapeMetrics").finish_non_exhaustive()
    }
}

impl ScrapeMetrics {
    /// Create a registry holding one gauge family per [`MetricKind`], the
    /// `artifactory_up` gauge, and the shared `failures` counter.
    pub fn new(failures: &IntCounter) -> Result<Self> {
        let registry = Registry::new();

        let mut gauges = HashMap::new();
        for kind in MetricKind::iter() {
            let desc = kind.descriptor();
            let gauge = GaugeVec::new(Opts::new(desc.name, desc.help), desc.labels)?;
            registry.register(Box::new(gauge.clone()))?;
            let _ = gauges.insert(kind, gauge);
        }

        let up = Gauge::new("artifactory_up", "Whether the last scrape of Artifactory succeeded.")?;
        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(failures.clone()))?;

        Ok(Self { registry, gauges, up })
    }

    /// Record whether the scrape's fetch-and-decode step succeeded.
    pub fn set_up(&self, up: bool) {
        self.up.set(if up { 1.0 } else { 0.0 });
    }

    /// Render everything in this registry in the Prometheus text exposition
    /// format.
    pub fn encode(&self) -> Result<String> {
        Ok(TextEncoder::new().encode_to_string(&self.registry.gather())?)
    }
}

impl MetricSink for ScrapeMetrics {
    fn write(&mut self, observation: Observation) {
        let Some(gauge) = self.gauges.get(&observation.kind) else {
            // Every kind is registered in new(); this can only happen if the
            // descriptor table and the registry fall out of sync.
            log::error!(target: LOG_TARGET, "No gauge registered for {:?}", observation.kind);
            return;
        };

        let labels: Vec<&str> = observation.labels.iter().map(String::as_str).collect();
        match gauge.get_metric_with_label_values(&labels) {
            Ok(metric) => metric.set(observation.value),
            Err(e) => {
                log::error!(target: LOG_TARGET, "Label mismatch for {:?}: {e}", observation.kind);
            }
        }
    }
}

/// Create the process-wide JSON parse-failure counter.
///
/// The counter is an explicit handle passed into the pipeline rather than a
/// global, so tests can observe increments in isolation. Clones share the
/// underlying atomic value.
pub fn parse_failure_counter() -> Result<IntCounter> {
    Ok(IntCounter::new(
        "artifactory_exporter_json_parse_failures_total",
        "Number of errors while parsing fields from Artifactory responses.",
    )?)
}
