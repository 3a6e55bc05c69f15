use super::Role;
use crate::audit::AuditCategory;

/// Named authorization predicates over the caller's role.
///
/// Every variant is a pure, total function of the role: evaluation never
/// fails, it only grants or denies. Business-write variants exclude
/// SUPERVISEUR after the membership check, so an explicit listing of
/// SUPERVISEUR in the allowed set still denies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Plain membership check.
    RoleIn(&'static [Role]),
    /// Full access; ADMIN and RESPONSABLE share permissions but stay
    /// separately attributable through the audit trail.
    AdminOrResponsable,
    /// Consultation-only surfaces, parameterized by role set.
    ReadOnly(&'static [Role]),
    /// The read-only superset: SUPERVISEUR plus the full-access roles.
    SuperviseurAccess,
    /// Domain mutation, open to the listed roles minus SUPERVISEUR.
    BusinessAction(&'static [Role]),
    /// Full-access business mutation. The SUPERVISEUR exclusion is
    /// unreachable given the member set and kept anyway.
    AdminBusinessAction,
}

impl AccessPolicy {
    pub fn evaluate(&self, role: Role) -> bool {
        match self {
            AccessPolicy::RoleIn(allowed) | AccessPolicy::ReadOnly(allowed) => {
                allowed.contains(&role)
            }
            AccessPolicy::AdminOrResponsable => {
                matches!(role, Role::Admin | Role::Responsable)
            }
            AccessPolicy::SuperviseurAccess => {
                matches!(role, Role::Admin | Role::Responsable | Role::Superviseur)
            }
            AccessPolicy::BusinessAction(allowed) => {
                allowed.contains(&role) && role != Role::Superviseur
            }
            AccessPolicy::AdminBusinessAction => {
                matches!(role, Role::Admin | Role::Responsable) && role != Role::Superviseur
            }
        }
    }

    /// Category of the audit entry emitted on grant, for policies whose
    /// grants are audit-worthy. `None` means the gate records nothing.
    pub fn audit_category(&self) -> Option<AuditCategory> {
        match self {
            AccessPolicy::AdminOrResponsable => Some(AuditCategory::ActionAdmin),
            AccessPolicy::SuperviseurAccess => Some(AuditCategory::Consultation),
            AccessPolicy::AdminBusinessAction => Some(AuditCategory::ActionMetier),
            AccessPolicy::RoleIn(_)
            | AccessPolicy::ReadOnly(_)
            | AccessPolicy::BusinessAction(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_or_responsable_grants_both_and_only_both() {
        let policy = AccessPolicy::AdminOrResponsable;
        assert!(policy.evaluate(Role::Admin));
        assert!(policy.evaluate(Role::Responsable));
        for role in [Role::Superviseur, Role::Charge, Role::Chauffeur, Role::Mecanicien] {
            assert!(!policy.evaluate(role), "{role} must be denied");
        }
    }

    #[test]
    fn superviseur_access_includes_full_access_roles() {
        let policy = AccessPolicy::SuperviseurAccess;
        assert!(policy.evaluate(Role::Admin));
        assert!(policy.evaluate(Role::Responsable));
        assert!(policy.evaluate(Role::Superviseur));
        assert!(!policy.evaluate(Role::Chauffeur));
    }

    #[test]
    fn business_action_excludes_superviseur_even_when_listed() {
        let policy = AccessPolicy::BusinessAction(&[
            Role::Admin,
            Role::Superviseur,
            Role::Charge,
        ]);
        assert!(policy.evaluate(Role::Admin));
        assert!(policy.evaluate(Role::Charge));
        assert!(!policy.evaluate(Role::Superviseur));
    }

    #[test]
    fn empty_role_set_denies_everyone() {
        for role in Role::ALL {
            assert!(!AccessPolicy::RoleIn(&[]).evaluate(role));
            assert!(!AccessPolicy::ReadOnly(&[]).evaluate(role));
            assert!(!AccessPolicy::BusinessAction(&[]).evaluate(role));
        }
    }

    #[test]
    fn admin_business_action_matches_admin_or_responsable_membership() {
        let policy = AccessPolicy::AdminBusinessAction;
        for role in Role::ALL {
            assert_eq!(
                policy.evaluate(role),
                AccessPolicy::AdminOrResponsable.evaluate(role)
            );
        }
    }

    #[test]
    fn audit_categories_match_policy_kinds() {
        assert_eq!(
            AccessPolicy::AdminOrResponsable.audit_category(),
            Some(AuditCategory::ActionAdmin)
        );
        assert_eq!(
            AccessPolicy::SuperviseurAccess.audit_category(),
            Some(AuditCategory::Consultation)
        );
        assert_eq!(
            AccessPolicy::AdminBusinessAction.audit_category(),
            Some(AuditCategory::ActionMetier)
        );
        assert_eq!(AccessPolicy::RoleIn(&[Role::Chauffeur]).audit_category(), None);
        assert_eq!(AccessPolicy::ReadOnly(&Role::ALL).audit_category(), None);
        assert_eq!(
            AccessPolicy::BusinessAction(&[Role::Charge]).audit_category(),
            None
        );
    }
}
