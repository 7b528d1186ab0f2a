//! The privileged read endpoints. Both share one pipeline: method check,
//! bearer-token authentication, allow-list authorization, then a query over
//! the elevated credential. Neither ever mutates anything.

pub mod transactions;
pub mod users;

use std::sync::Arc;

use crate::database::admin::AdminStore;
use crate::error::ApiError;
use crate::state::AppState;

/// The elevated store, or the configuration failure that stands in for it.
/// Only called after authentication and authorization have passed, so a
/// misconfigured deployment is indistinguishable from a working one to
/// anyone who is not an administrator.
pub(super) fn elevated_store(state: &AppState) -> Result<&Arc<dyn AdminStore>, ApiError> {
    state
        .admin
        .as_ref()
        .ok_or_else(|| ApiError::configuration("Service database credentials missing"))
}
