//! Admin authentication gate.

use crate::store::TicketStore;

/// Whether `username`/`password` match a stored admin record exactly.
///
/// Fail-closed: a store error is logged and reported as `false`, so callers
/// cannot tell bad credentials from an unreachable store.
pub async fn verify_admin(store: &dyn TicketStore, username: &str, password: &str) -> bool {
    if username.is_empty() || password.is_empty() {
        return false;
    }
    match store.admin_exists(username, password).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(error = %e, "admin verification failed, denying access");
            false
        }
    }
}
