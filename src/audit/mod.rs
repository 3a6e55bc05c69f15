//! Audit trail - recorder, reader and the line format shared by both.
//!
//! The log is a single append-only text file. Writes are best-effort: a
//! failed append is reported via `tracing` and never surfaces to the
//! request that triggered it.

mod entry;
mod reader;
mod recorder;

pub use entry::{AuditCategory, AuditEntry};
pub use reader::{AuditReader, RoleActivity, RoleStatistics};
pub use recorder::AuditRecorder;

use serde::{Deserialize, Serialize};

/// Client metadata attached to audit entries (proxy-aware IP).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract client address from request headers.
    pub fn from_headers(headers: &axum::http::HeaderMap) -> Self {
        let ip = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.split(',').next().unwrap_or(s).trim().to_string())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .map(String::from)
            });

        Self { ip }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }
}
