//! Resolve a signed-in account to exactly one employee record.
//!
//! Two-step lookup: membership by account, then employee by membership. An
//! email-based fallback covers employees provisioned before their account
//! existed, and opportunistically backfills the membership link. Failure is
//! terminal for the run; there is nothing to retry.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::backend::Backend;
use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;

pub fn resolve_employee(
    backend: &dyn Backend,
    account_id: Uuid,
    email: &str,
) -> AppResult<Employee> {
    let memberships = backend.memberships_by_account(account_id)?;
    let membership = memberships
        .first()
        .ok_or_else(|| AppError::NoMembership(account_id.to_string()))?;
    if memberships.len() > 1 {
        debug!(
            count = memberships.len(),
            "multiple memberships for account, using oldest"
        );
    }

    if let Some(employee) = backend.employee_by_membership(membership.id)? {
        return Ok(employee);
    }

    match backend.employee_by_email(membership.org_id, email)? {
        Some(mut employee) => {
            // Best-effort backfill of the missing link; the resolved employee
            // is valid either way.
            match backend.link_employee_membership(employee.id, membership.id) {
                Ok(()) => employee.membership_id = Some(membership.id),
                Err(e) => warn!(error = %e, "membership backfill failed, continuing"),
            }
            Ok(employee)
        }
        None => Err(AppError::NoEmployee(email.to_string())),
    }
}
