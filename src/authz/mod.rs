//! Authorization module - roles, policies and the decision gate
//!
//! This module implements the RBAC layer:
//! - A closed set of six roles
//! - Table-driven access policies evaluated per request
//! - A single enforcement point that pairs grants with audit entries

mod gate;
mod identity;
mod policy;

pub use gate::DecisionGate;
pub use identity::IdentityContext;
pub use policy::AccessPolicy;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The six application roles. The set is closed: a role string that does
/// not map to one of these variants fails every policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Responsable,
    Superviseur,
    Charge,
    Chauffeur,
    Mecanicien,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Responsable,
        Role::Superviseur,
        Role::Charge,
        Role::Chauffeur,
        Role::Mecanicien,
    ];

    /// The literal role string as it appears in sessions and audit logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Responsable => "RESPONSABLE",
            Role::Superviseur => "SUPERVISEUR",
            Role::Charge => "CHARGE",
            Role::Chauffeur => "CHAUFFEUR",
            Role::Mecanicien => "MECANICIEN",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "ADMIN" => Some(Role::Admin),
            "RESPONSABLE" => Some(Role::Responsable),
            "SUPERVISEUR" => Some(Role::Superviseur),
            "CHARGE" => Some(Role::Charge),
            "CHAUFFEUR" => Some(Role::Chauffeur),
            "MECANICIEN" => Some(Role::Mecanicien),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_strings_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn unknown_role_does_not_parse() {
        assert_eq!(Role::parse("SUPER_ADMIN"), None);
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse(""), None);
    }
}
