use super::{AccessPolicy, IdentityContext};
use crate::audit::{AuditEntry, AuditRecorder, RequestContext};
use crate::errors::AppError;

/// The single enforcement point combining policy evaluation and audit
/// recording. Handlers call `authorize` before touching domain data.
#[derive(Clone)]
pub struct DecisionGate {
    recorder: AuditRecorder,
}

impl DecisionGate {
    pub fn new(recorder: AuditRecorder) -> Self {
        Self { recorder }
    }

    /// Grants or denies `action` for the caller.
    ///
    /// On grant, audit-worthy policies emit exactly one entry carrying the
    /// caller's literal role string before the handler proceeds. Denials
    /// emit nothing.
    pub fn authorize(
        &self,
        identity: &IdentityContext,
        policy: &AccessPolicy,
        action: &str,
        ctx: &RequestContext,
        details: Option<&str>,
    ) -> Result<(), AppError> {
        if !policy.evaluate(identity.role) {
            tracing::debug!(
                user_id = %identity.user_id,
                role = %identity.role,
                action = %action,
                "access denied"
            );
            return Err(AppError::forbidden("Access denied"));
        }

        if let Some(category) = policy.audit_category() {
            let entry = AuditEntry::for_grant(identity, category, action, ctx, details);
            self.recorder.record(&entry);
        }

        Ok(())
    }
}
