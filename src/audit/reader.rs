use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::AuditEntry;

/// Statistics scan only the most recent slice of the log.
const STATISTICS_SCAN_LIMIT: usize = 1000;

/// Per-role aggregate over the scanned entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct RoleActivity {
    pub total: u64,
    /// Occurrences per operation name (the FUNCTION field).
    pub actions: BTreeMap<String, u64>,
}

/// Role-bucketed statistics. Roles outside the three tracked ones are
/// folded into `autres`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct RoleStatistics {
    pub admin: RoleActivity,
    pub responsable: RoleActivity,
    pub superviseur: RoleActivity,
    pub autres: RoleActivity,
}

/// Read side of the audit trail, parsing persisted lines back into
/// structured entries. Shares its path with the recorder by construction.
#[derive(Debug, Clone)]
pub struct AuditReader {
    path: Arc<PathBuf>,
}

impl AuditReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: Arc::new(path.into()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the most recent entries, newest first.
    ///
    /// `limit` truncates to the most recent physical lines BEFORE the
    /// role/action filters run, so a filter can return fewer matches than
    /// exist in the full log. That ordering is load-bearing for
    /// compatibility with the operator views; do not swap it.
    pub fn get_audit_logs(
        &self,
        limit: usize,
        role_filter: Option<&str>,
        action_filter: Option<&str>,
    ) -> Vec<AuditEntry> {
        let content = match std::fs::read_to_string(self.path.as_ref()) {
            Ok(content) => content,
            // A log that was never written to is an empty log.
            Err(_) => return Vec::new(),
        };

        let lines: Vec<&str> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        let start = lines.len().saturating_sub(limit);

        let role_needle = role_filter.map(|f| format!("ROLE:{f}"));
        let action_needle = action_filter.map(|f| format!("ACTION:{f}"));

        let mut entries = Vec::new();
        for line in lines[start..].iter().rev() {
            if let Some(needle) = &role_needle {
                if !line.contains(needle.as_str()) {
                    continue;
                }
            }
            if let Some(needle) = &action_needle {
                if !line.contains(needle.as_str()) {
                    continue;
                }
            }
            // Malformed lines are skipped, never fatal.
            if let Some(entry) = AuditEntry::parse_line(line) {
                entries.push(entry);
            }
        }
        entries
    }

    /// Aggregates the most recent 1000 entries into role buckets with
    /// per-operation counts.
    pub fn get_role_statistics(&self) -> RoleStatistics {
        let entries = self.get_audit_logs(STATISTICS_SCAN_LIMIT, None, None);

        let mut stats = RoleStatistics::default();
        for entry in &entries {
            let bucket = match entry.role.as_str() {
                "ADMIN" => &mut stats.admin,
                "RESPONSABLE" => &mut stats.responsable,
                "SUPERVISEUR" => &mut stats.superviseur,
                _ => &mut stats.autres,
            };
            bucket.total += 1;
            *bucket.actions.entry(entry.function.clone()).or_insert(0) += 1;
        }
        stats
    }
}
