//! Typed account snapshot returned by the RunPod API.

use serde::Deserialize;

/// One immutable fetch of account data, valid for a single run.
///
/// Models exactly the subset of the `myself` object the exporter consumes.
/// Fields the API can return as null are `Option`; everything else is
/// required, so an incomplete response fails the parse instead of producing
/// a partially-valid snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub current_spend_per_hr: f64,
    pub referral_earned: f64,
    pub template_earned: f64,
    pub client_balance: f64,
    pub host_balance: f64,
    pub min_balance: f64,
    pub spend_limit: f64,
    pub machine_quota: i64,
    pub max_serverless_concurrency: i64,
    pub referral: Option<ReferralStats>,
    pub spend_details: Option<SpendDetails>,
    pub pods: Vec<Pod>,
    pub endpoints: Vec<Endpoint>,
    pub network_volumes: Vec<NetworkVolume>,
    pub savings_plans: Vec<SavingsPlan>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralStats {
    pub current_month: ReferralMonth,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralMonth {
    pub total_referrals: i64,
    pub total_spend: f64,
}

/// Per-hour spend broken down by resource class.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendDetails {
    pub local_storage_per_hour: f64,
    pub network_storage_per_hour: f64,
    pub gpu_compute_per_hour: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    pub id: String,
    pub desired_status: String,
    pub cost_per_hr: f64,
    /// Null while the pod is stopped.
    pub runtime: Option<PodRuntime>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodRuntime {
    pub uptime_in_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub id: String,
    pub workers_min: i64,
    pub workers_max: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkVolume {
    pub id: String,
    /// Size in GB.
    pub size: i64,
}

/// Savings plans are only counted; no fields are consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct SavingsPlan {}
