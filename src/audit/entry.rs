use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RequestContext;
use crate::authz::IdentityContext;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const UNKNOWN_IP: &str = "UNKNOWN";

/// Closed set of auditable action categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditCategory {
    Consultation,
    Creation,
    Modification,
    Suppression,
    ActionMetier,
    ActionAdmin,
    Test,
    Verification,
}

impl AuditCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditCategory::Consultation => "CONSULTATION",
            AuditCategory::Creation => "CREATION",
            AuditCategory::Modification => "MODIFICATION",
            AuditCategory::Suppression => "SUPPRESSION",
            AuditCategory::ActionMetier => "ACTION_METIER",
            AuditCategory::ActionAdmin => "ACTION_ADMIN",
            AuditCategory::Test => "TEST",
            AuditCategory::Verification => "VERIFICATION",
        }
    }

    /// Log level recorded with the entry. Destructive and administrative
    /// categories log at WARNING, everything else at INFO.
    pub fn level(&self) -> &'static str {
        match self {
            AuditCategory::Suppression | AuditCategory::ActionAdmin => "WARNING",
            _ => "INFO",
        }
    }
}

impl std::fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable record of a granted, executed action.
///
/// `role` and `action` stay plain strings on the read side: the reader must
/// hand back whatever the log contains, including roles outside the closed
/// set (they land in the AUTRES statistics bucket).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditEntry {
    /// Second-precision timestamp, as written to the log.
    pub timestamp: NaiveDateTime,
    pub level: String,
    pub user_id: String,
    /// Literal role string of the actor, never normalized. This is what
    /// keeps ADMIN and RESPONSABLE separately attributable.
    pub role: String,
    /// Action category, one of `AuditCategory`.
    pub action: String,
    /// Free-form operation name, typically the handler name.
    pub function: String,
    pub ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AuditEntry {
    /// Build the entry for a granted gate invocation.
    pub fn for_grant(
        identity: &IdentityContext,
        category: AuditCategory,
        action: &str,
        ctx: &RequestContext,
        details: Option<&str>,
    ) -> Self {
        Self {
            timestamp: Utc::now().naive_utc(),
            level: category.level().to_string(),
            user_id: identity.user_id.to_string(),
            role: identity.role.as_str().to_string(),
            action: category.as_str().to_string(),
            function: action.to_string(),
            ip: ctx.ip.clone().unwrap_or_else(|| UNKNOWN_IP.to_string()),
            details: details.map(str::to_string),
        }
    }

    /// Serialize to the pipe-delimited line format:
    ///
    /// `2025-01-01 12:00:00 | INFO | USER:<id> | ROLE:<role> |
    ///  ACTION:<category> | FUNCTION:<name> | IP:<addr>[ | DETAILS:<text>]`
    pub fn to_line(&self) -> String {
        let mut line = format!(
            "{} | {} | USER:{} | ROLE:{} | ACTION:{} | FUNCTION:{} | IP:{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.level,
            self.user_id,
            self.role,
            self.action,
            self.function,
            self.ip,
        );
        if let Some(details) = &self.details {
            line.push_str(" | DETAILS:");
            line.push_str(details);
        }
        line
    }

    /// Best-effort parse of one log line. Returns `None` for anything that
    /// does not match the format; the caller skips those lines.
    pub fn parse_line(line: &str) -> Option<AuditEntry> {
        let parts: Vec<&str> = line.split(" | ").collect();
        if parts.len() < 7 {
            return None;
        }

        let timestamp = NaiveDateTime::parse_from_str(parts[0], TIMESTAMP_FORMAT).ok()?;
        let level = parts[1];
        if level.is_empty() {
            return None;
        }

        let user_id = parts[2].strip_prefix("USER:")?;
        let role = parts[3].strip_prefix("ROLE:")?;
        let action = parts[4].strip_prefix("ACTION:")?;
        let function = parts[5].strip_prefix("FUNCTION:")?;
        let ip = parts[6].strip_prefix("IP:")?;

        let details = if parts.len() > 7 {
            // Details may themselves contain the delimiter; rejoin the tail.
            Some(parts[7..].join(" | ").strip_prefix("DETAILS:")?.to_string())
        } else {
            None
        };

        Some(AuditEntry {
            timestamp,
            level: level.to_string(),
            user_id: user_id.to_string(),
            role: role.to_string(),
            action: action.to_string(),
            function: function.to_string(),
            ip: ip.to_string(),
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(details: Option<&str>) -> AuditEntry {
        AuditEntry {
            timestamp: NaiveDateTime::parse_from_str("2025-06-01 08:30:00", TIMESTAMP_FORMAT)
                .unwrap(),
            level: "INFO".to_string(),
            user_id: "42".to_string(),
            role: "RESPONSABLE".to_string(),
            action: "CONSULTATION".to_string(),
            function: "list_buses".to_string(),
            ip: "192.168.1.10".to_string(),
            details: details.map(str::to_string),
        }
    }

    #[test]
    fn line_round_trips() {
        let entry = sample_entry(None);
        assert_eq!(AuditEntry::parse_line(&entry.to_line()), Some(entry));
    }

    #[test]
    fn line_round_trips_with_details() {
        let entry = sample_entry(Some("bus 12 retired"));
        let line = entry.to_line();
        assert!(line.ends_with("DETAILS:bus 12 retired"));
        assert_eq!(AuditEntry::parse_line(&line), Some(entry));
    }

    #[test]
    fn details_containing_delimiter_survive() {
        let entry = sample_entry(Some("before | after"));
        assert_eq!(AuditEntry::parse_line(&entry.to_line()), Some(entry));
    }

    #[test]
    fn malformed_lines_do_not_parse() {
        assert_eq!(AuditEntry::parse_line(""), None);
        assert_eq!(AuditEntry::parse_line("not an audit line"), None);
        assert_eq!(
            AuditEntry::parse_line("2025-06-01 08:30:00 | INFO | USER:1 | ROLE:ADMIN"),
            None
        );
        // Wrong field prefix
        assert_eq!(
            AuditEntry::parse_line(
                "2025-06-01 08:30:00 | INFO | ACCOUNT:1 | ROLE:ADMIN | ACTION:TEST | FUNCTION:f | IP:x"
            ),
            None
        );
        // Unparseable timestamp
        assert_eq!(
            AuditEntry::parse_line(
                "yesterday | INFO | USER:1 | ROLE:ADMIN | ACTION:TEST | FUNCTION:f | IP:x"
            ),
            None
        );
    }

    #[test]
    fn category_levels() {
        assert_eq!(AuditCategory::Consultation.level(), "INFO");
        assert_eq!(AuditCategory::ActionMetier.level(), "INFO");
        assert_eq!(AuditCategory::Suppression.level(), "WARNING");
        assert_eq!(AuditCategory::ActionAdmin.level(), "WARNING");
    }
}
