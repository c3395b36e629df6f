//! DTOs for health check endpoint.

use serde::{Deserialize, Serialize};

/// Health check response with component status.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Health status for each store keyspace.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub codes: CheckStatus,
    pub limits: CheckStatus,
}

/// Individual component health status.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn from_probe(ok: bool, keyspace: &str) -> Self {
        if ok {
            Self {
                status: "ok".to_string(),
                message: Some(format!("{keyspace} store reachable")),
            }
        } else {
            Self {
                status: "error".to_string(),
                message: Some(format!("{keyspace} store unreachable")),
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
