//! Reference data reads backing the job option lists.

use uuid::Uuid;

use crate::backend::Backend;
use crate::errors::AppResult;
use crate::models::lookups::{BillingCategory, Property, Unit};

pub fn properties(backend: &dyn Backend, org_id: Uuid) -> AppResult<Vec<Property>> {
    backend.properties(org_id)
}

pub fn units(backend: &dyn Backend, property_id: Uuid) -> AppResult<Vec<Unit>> {
    backend.units(property_id)
}

pub fn billing_categories(backend: &dyn Backend, org_id: Uuid) -> AppResult<Vec<BillingCategory>> {
    backend.billing_categories(org_id)
}
