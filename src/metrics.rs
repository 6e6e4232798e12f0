//! Projects an account snapshot into textfile-collector metric lines.

use crate::account::snapshot::AccountSnapshot;
use crate::error::ExportError;
use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Count(i64),
    Gauge(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // {:?} is the shortest round-trip form, so whole gauges keep
            // their trailing .0 instead of collapsing to an integer.
            MetricValue::Gauge(value) => write!(f, "{value:?}"),
            MetricValue::Count(value) => write!(f, "{value}"),
        }
    }
}

/// One line of exposition text: `name value` or `name{key="value"} value`.
#[derive(Debug, Clone)]
pub struct MetricLine {
    name: &'static str,
    labels: Vec<(&'static str, String)>,
    value: MetricValue,
}

impl MetricLine {
    fn gauge(name: &'static str, value: f64) -> Self {
        Self {
            name,
            labels: Vec::new(),
            value: MetricValue::Gauge(value),
        }
    }

    fn count(name: &'static str, value: i64) -> Self {
        Self {
            name,
            labels: Vec::new(),
            value: MetricValue::Count(value),
        }
    }

    fn with_label(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.labels.push((key, value.into()));
        self
    }
}

impl fmt::Display for MetricLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.labels.is_empty() {
            let rendered: Vec<String> = self
                .labels
                .iter()
                .map(|(key, value)| format!("{key}=\"{value}\""))
                .collect();
            write!(f, "{{{}}}", rendered.join(","))?;
        }
        write!(f, " {}", self.value)
    }
}

/// Selects the exported fields in their fixed order.
///
/// `fetched_at` is passed in by the caller so the selection itself stays
/// deterministic. Fails when a selected sub-record is absent: a missing
/// balance series must abort the run, not read as zero.
pub fn collect(
    snapshot: &AccountSnapshot,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<MetricLine>, ExportError> {
    let referral = snapshot
        .referral
        .as_ref()
        .ok_or(ExportError::MissingField("referral"))?;
    let spend = snapshot
        .spend_details
        .as_ref()
        .ok_or(ExportError::MissingField("spendDetails"))?;

    let mut lines = vec![
        MetricLine::gauge("current_spend_per_hour", snapshot.current_spend_per_hr),
        MetricLine::gauge("referral_earned", snapshot.referral_earned),
        MetricLine::gauge("template_earned", snapshot.template_earned),
        MetricLine::gauge("client_balance", snapshot.client_balance),
        MetricLine::gauge("host_balance", snapshot.host_balance),
        MetricLine::count("total_referrals", referral.current_month.total_referrals),
        MetricLine::gauge("referral_spend", referral.current_month.total_spend),
        MetricLine::count("num_pods", snapshot.pods.len() as i64),
        MetricLine::count("num_endpoints", snapshot.endpoints.len() as i64),
        MetricLine::count("num_network_volumes", snapshot.network_volumes.len() as i64),
        MetricLine::count("num_savings_plans", snapshot.savings_plans.len() as i64),
        MetricLine::count("max_serverless_workers", snapshot.max_serverless_concurrency),
        MetricLine::count("machine_quota", snapshot.machine_quota),
        MetricLine::gauge("spend_limit", snapshot.spend_limit),
        MetricLine::gauge("min_balance", snapshot.min_balance),
        MetricLine::gauge("local_storage_per_hour", spend.local_storage_per_hour),
        MetricLine::gauge("network_storage_per_hour", spend.network_storage_per_hour),
        MetricLine::gauge("gpu_compute_per_hour", spend.gpu_compute_per_hour),
    ];

    for pod in &snapshot.pods {
        lines.push(
            MetricLine::gauge("pod_cost_per_hour", pod.cost_per_hr).with_label("pod", &pod.id),
        );
        lines.push(
            MetricLine::count("pod_running", i64::from(pod.desired_status == "RUNNING"))
                .with_label("pod", &pod.id),
        );
        // Stopped pods have no runtime; absence of the series is accurate.
        if let Some(runtime) = &pod.runtime {
            lines.push(
                MetricLine::count("pod_uptime_seconds", runtime.uptime_in_seconds)
                    .with_label("pod", &pod.id),
            );
        }
    }

    for endpoint in &snapshot.endpoints {
        lines.push(
            MetricLine::count("endpoint_workers_min", endpoint.workers_min)
                .with_label("endpoint", &endpoint.id),
        );
        lines.push(
            MetricLine::count("endpoint_workers_max", endpoint.workers_max)
                .with_label("endpoint", &endpoint.id),
        );
    }

    for volume in &snapshot.network_volumes {
        lines.push(
            MetricLine::count("network_volume_size_gb", volume.size)
                .with_label("volume", &volume.id),
        );
    }

    lines.push(MetricLine::count(
        "last_updated_timestamp_seconds",
        fetched_at.timestamp(),
    ));

    Ok(lines)
}

/// Renders lines into exposition text, one newline-terminated line each.
pub fn render(lines: &[MetricLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}
