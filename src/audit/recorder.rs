use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::AuditEntry;

/// Append-only writer for the shared audit log.
///
/// An explicit handle rather than a global logger: it is constructed once
/// at startup and handed to the decision gate, which keeps tests free to
/// point it at a scratch file.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    path: Arc<PathBuf>,
}

impl AuditRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(err) = std::fs::create_dir_all(parent) {
                    tracing::warn!(
                        path = %parent.display(),
                        error = %err,
                        "could not create audit log directory"
                    );
                }
            }
        }
        Self { path: Arc::new(path) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry. Audit completeness is secondary to availability:
    /// an I/O failure is reported on the tracing channel and swallowed so
    /// the gated business operation proceeds regardless.
    pub fn record(&self, entry: &AuditEntry) {
        if let Err(err) = self.append(entry) {
            tracing::error!(
                path = %self.path.display(),
                error = %err,
                "failed to append audit entry"
            );
        }
    }

    fn append(&self, entry: &AuditEntry) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.path.as_ref())?;
        // Single write per entry; line-level interleaving under concurrent
        // writers is whatever the OS guarantees for O_APPEND.
        file.write_all(format!("{}\n", entry.to_line()).as_bytes())
    }
}
