use serde::Serialize;
use ts_rs::TS;

/// Outcome of probing one backing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/probe-state.ts"
)]
pub enum ProbeState {
    /// The service is not configured for this process.
    Disabled,
    /// The probe round-tripped.
    Ok,
    /// The probe failed or timed out.
    Error,
}

/// One probed dependency.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/dependency-probe.ts"
)]
pub struct DependencyProbe {
    pub status: ProbeState,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub detail: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    /// `ok` when every configured dependency answered, `degraded` otherwise.
    pub status: &'static str,
    pub ready: bool,
    pub postgres: DependencyProbe,
}
