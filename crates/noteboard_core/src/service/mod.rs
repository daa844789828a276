//! Resource services for notes, news and comments.
//!
//! # Responsibility
//! - Run every operation as `authorize -> validate -> persist`.
//! - Keep callers decoupled from storage details and guard decisions.
//!
//! # Invariants
//! - No storage write happens before the guard allows the operation.
//! - Every failure is terminal for the operation; nothing is retried.

pub mod comment_service;
mod error;
pub mod news_service;
pub mod note_service;

pub use error::{ResourceUnavailable, ServiceError};

use crate::access::{authorize, authorize_page, Action, Decision};
use crate::model::user::{Caller, UserId};
use crate::routes::RouteConfig;
use log::{error, info};

/// Authorizes an operation and converts a non-`Allow` decision into the
/// matching terminal error.
pub(crate) fn guard(
    caller: &Caller,
    resource_owner: Option<UserId>,
    action: Action,
    requested_path: &str,
    routes: &RouteConfig,
    event: &'static str,
) -> Result<(), ServiceError> {
    let decision = authorize(caller, resource_owner, action, requested_path);
    enforce(decision, routes, event, action.as_str())
}

/// Page-level variant of `guard` for views without a resource owner.
pub(crate) fn guard_page(
    caller: &Caller,
    requested_path: &str,
    routes: &RouteConfig,
    event: &'static str,
) -> Result<(), ServiceError> {
    let decision = authorize_page(caller, routes, requested_path);
    enforce(decision, routes, event, "page")
}

fn enforce(
    decision: Decision,
    routes: &RouteConfig,
    event: &'static str,
    action: &'static str,
) -> Result<(), ServiceError> {
    if !decision.is_allowed() {
        info!(
            "event={event} module=service status=denied action={action} decision={}",
            decision.as_str()
        );
    }
    match decision {
        Decision::Allow => Ok(()),
        Decision::RedirectToLogin { next } => Err(ServiceError::Unauthenticated {
            login_url: routes.login_redirect(&next),
        }),
        Decision::DenyAsNotFound => {
            Err(ServiceError::Unavailable(ResourceUnavailable::NotOwner))
        }
    }
}

/// Identity of a caller the guard already let through.
pub(crate) fn acting_user(caller: &Caller) -> Result<UserId, ServiceError> {
    caller
        .user_id()
        .ok_or(ServiceError::InconsistentState("authorized caller has no identity"))
}

/// Logs a failed write and hands the error back.
pub(crate) fn log_failure(event: &'static str, err: ServiceError) -> ServiceError {
    match &err {
        ServiceError::Storage(_) | ServiceError::InconsistentState(_) => error!(
            "event={event} module=service status=error error_code={} error={err}",
            err.code()
        ),
        _ => info!(
            "event={event} module=service status=rejected error_code={}",
            err.code()
        ),
    }
    err
}
