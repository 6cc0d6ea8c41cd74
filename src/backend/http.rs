//! HTTP adapter for the remote backend.
//!
//! Routes follow the PostgREST layout the backend exposes: table reads and
//! writes under `/rest/v1/<table>`, stored procedures under
//! `/rest/v1/rpc/<name>`. Every request carries the project api key and the
//! account's bearer token; row-level security on the server scopes the rows.

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::clock_period::ClockPeriod;
use crate::models::clock_session::ClockSession;
use crate::models::employee::{Employee, Membership};
use crate::models::location_point::LocationPoint;
use crate::models::lookups::{BillingCategory, Property, Unit};
use crate::models::time_entry::{NewTimeEntry, TimeEntry, TimeEntryPatch};
use crate::models::workday::Workday;

use super::{Backend, ClockInRow, StartSessionParams};

pub struct HttpBackend {
    base_url: String,
    api_key: String,
    access_token: String,
    http: Client,
}

impl HttpBackend {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            base_url: cfg.backend_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            access_token: cfg.access_token.clone(),
            http: Client::new(),
        }
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = if self.access_token.is_empty() {
            &self.api_key
        } else {
            &self.access_token
        };
        req.header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    fn check(resp: Response) -> AppResult<Response> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let message = resp.text().unwrap_or_default();
            Err(AppError::Backend {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Call a stored procedure and decode its JSON result. Void procedures
    /// answer with an empty body; that decodes to null.
    fn rpc<P: Serialize>(&self, name: &str, params: &P) -> AppResult<serde_json::Value> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, name);
        debug!(procedure = name, "rpc call");
        let resp = self.authed(self.http.post(&url).json(params)).send()?;
        let resp = Self::check(resp)?;
        let body = resp.text()?;
        if body.trim().is_empty() {
            Ok(serde_json::Value::Null)
        } else {
            Ok(serde_json::from_str(&body)?)
        }
    }

    /// Procedure returning exactly one row (object, or single-element array).
    fn rpc_row<P: Serialize, R: DeserializeOwned>(&self, name: &str, params: &P) -> AppResult<R> {
        let value = self.rpc(name, params)?;
        let row = match value {
            serde_json::Value::Array(mut rows) if !rows.is_empty() => rows.remove(0),
            serde_json::Value::Array(_) | serde_json::Value::Null => {
                return Err(AppError::Backend {
                    status: 200,
                    message: format!("procedure {} returned no row", name),
                });
            }
            other => other,
        };
        Ok(serde_json::from_value(row)?)
    }

    /// Procedure returning zero or one row.
    fn rpc_opt_row<P: Serialize, R: DeserializeOwned>(
        &self,
        name: &str,
        params: &P,
    ) -> AppResult<Option<R>> {
        let value = self.rpc(name, params)?;
        let row = match value {
            serde_json::Value::Null => return Ok(None),
            serde_json::Value::Array(mut rows) => {
                if rows.is_empty() {
                    return Ok(None);
                }
                rows.remove(0)
            }
            other => other,
        };
        Ok(serde_json::from_value(row)?)
    }

    fn rpc_void<P: Serialize>(&self, name: &str, params: &P) -> AppResult<()> {
        self.rpc(name, params)?;
        Ok(())
    }

    /// Filtered table read. `filters` are PostgREST query pairs,
    /// e.g. `("account_id", "eq.<uuid>")`.
    fn select<R: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> AppResult<Vec<R>> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let resp = self
            .authed(self.http.get(&url).query(filters))
            .send()?;
        let resp = Self::check(resp)?;
        Ok(resp.json()?)
    }

    fn select_one<R: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> AppResult<Option<R>> {
        let mut rows: Vec<R> = self.select(table, filters)?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    /// Insert one row and return the stored representation.
    fn insert<B: Serialize>(&self, table: &str, body: &B) -> AppResult<serde_json::Value> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let resp = self
            .authed(
                self.http
                    .post(&url)
                    .header("Prefer", "return=representation")
                    .json(body),
            )
            .send()?;
        let resp = Self::check(resp)?;
        let mut rows: Vec<serde_json::Value> = resp.json()?;
        if rows.is_empty() {
            return Err(AppError::Backend {
                status: 200,
                message: format!("insert into {} returned no representation", table),
            });
        }
        Ok(rows.remove(0))
    }

    fn patch<B: Serialize>(
        &self,
        table: &str,
        filters: &[(&str, String)],
        body: &B,
    ) -> AppResult<()> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let resp = self
            .authed(self.http.patch(&url).query(filters).json(body))
            .send()?;
        Self::check(resp)?;
        Ok(())
    }

    fn delete(&self, table: &str, filters: &[(&str, String)]) -> AppResult<()> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let resp = self.authed(self.http.delete(&url).query(filters)).send()?;
        Self::check(resp)?;
        Ok(())
    }
}

fn eq(id: Uuid) -> String {
    format!("eq.{}", id)
}

impl Backend for HttpBackend {
    fn clock_in(&self, employee_id: Uuid) -> AppResult<ClockInRow> {
        self.rpc_row("clock_in", &json!({ "p_employee_id": employee_id }))
    }

    fn clock_out(&self, employee_id: Uuid) -> AppResult<()> {
        self.rpc_void("clock_out", &json!({ "p_employee_id": employee_id }))
    }

    fn start_session(&self, params: &StartSessionParams) -> AppResult<ClockSession> {
        self.rpc_row(
            "start_session",
            &json!({
                "p_employee_id": params.employee_id,
                "p_workday_id": params.workday_id,
                "p_clock_period_id": params.clock_period_id,
                "p_notes": params.notes,
                "p_property_id": params.property_id,
                "p_unit_id": params.unit_id,
                "p_billing_category_id": params.billing_category_id,
            }),
        )
    }

    fn end_workday(&self, employee_id: Uuid) -> AppResult<()> {
        self.rpc_void("end_workday", &json!({ "p_employee_id": employee_id }))
    }

    fn get_active_workday(&self, employee_id: Uuid) -> AppResult<Option<Workday>> {
        self.rpc_opt_row("get_active_workday", &json!({ "p_employee_id": employee_id }))
    }

    fn get_active_clock_period(&self, employee_id: Uuid) -> AppResult<Option<ClockPeriod>> {
        self.rpc_opt_row(
            "get_active_clock_period",
            &json!({ "p_employee_id": employee_id }),
        )
    }

    fn append_location_point(&self, point: &LocationPoint) -> AppResult<()> {
        self.rpc_void(
            "append_location_point",
            &json!({
                "p_workday_id": point.workday_id,
                "p_clock_session_id": point.clock_session_id,
                "p_latitude": point.latitude,
                "p_longitude": point.longitude,
                "p_accuracy": point.accuracy,
                "p_altitude": point.altitude,
                "p_speed": point.speed,
                "p_heading": point.heading,
                "p_recorded_at": point.recorded_at,
            }),
        )
    }

    fn memberships_by_account(&self, account_id: Uuid) -> AppResult<Vec<Membership>> {
        self.select(
            "org_memberships",
            &[
                ("account_id", eq(account_id)),
                ("order", "created_at.asc".to_string()),
            ],
        )
    }

    fn employee_by_membership(&self, membership_id: Uuid) -> AppResult<Option<Employee>> {
        self.select_one("employees", &[("membership_id", eq(membership_id))])
    }

    fn employee_by_email(&self, org_id: Uuid, email: &str) -> AppResult<Option<Employee>> {
        self.select_one(
            "employees",
            &[
                ("org_id", eq(org_id)),
                ("email", format!("eq.{}", email)),
            ],
        )
    }

    fn link_employee_membership(&self, employee_id: Uuid, membership_id: Uuid) -> AppResult<()> {
        self.patch(
            "employees",
            &[("id", eq(employee_id))],
            &json!({ "membership_id": membership_id }),
        )
    }

    fn clock_session(&self, id: Uuid) -> AppResult<Option<ClockSession>> {
        self.select_one("clock_sessions", &[("id", eq(id))])
    }

    fn open_clock_session(&self, workday_id: Uuid) -> AppResult<Option<ClockSession>> {
        self.select_one(
            "clock_sessions",
            &[
                ("workday_id", eq(workday_id)),
                ("ended_at", "is.null".to_string()),
            ],
        )
    }

    fn close_clock_session(&self, id: Uuid, ended_at: DateTime<Utc>) -> AppResult<()> {
        self.patch(
            "clock_sessions",
            &[("id", eq(id))],
            &json!({ "ended_at": ended_at }),
        )
    }

    fn insert_time_entry(&self, entry: &NewTimeEntry) -> AppResult<Uuid> {
        let row = self.insert("time_entries", entry)?;
        let id = row
            .get("id")
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| AppError::Backend {
                status: 200,
                message: "time entry insert returned no id".to_string(),
            })?;
        Ok(id)
    }

    fn time_entry(&self, id: Uuid) -> AppResult<Option<TimeEntry>> {
        // The view carries the denormalized property/category names.
        self.select_one("time_entries_view", &[("id", eq(id))])
    }

    fn time_entries(
        &self,
        employee_id: Uuid,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<Vec<TimeEntry>> {
        let mut filters = vec![
            ("employee_id", eq(employee_id)),
            ("order", "started_at.desc".to_string()),
        ];
        if let Some((start, end)) = range {
            filters.push(("entry_date", format!("gte.{}", start)));
            filters.push(("entry_date", format!("lte.{}", end)));
        }
        self.select("time_entries_view", &filters)
    }

    fn update_time_entry(&self, id: Uuid, patch: &TimeEntryPatch) -> AppResult<()> {
        self.patch("time_entries", &[("id", eq(id))], patch)
    }

    fn delete_time_entry(&self, id: Uuid) -> AppResult<()> {
        self.delete("time_entries", &[("id", eq(id))])
    }

    fn properties(&self, org_id: Uuid) -> AppResult<Vec<Property>> {
        self.select(
            "properties",
            &[("org_id", eq(org_id)), ("order", "name.asc".to_string())],
        )
    }

    fn units(&self, property_id: Uuid) -> AppResult<Vec<Unit>> {
        self.select(
            "units",
            &[
                ("property_id", eq(property_id)),
                ("order", "name.asc".to_string()),
            ],
        )
    }

    fn billing_categories(&self, org_id: Uuid) -> AppResult<Vec<BillingCategory>> {
        self.select(
            "billing_categories",
            &[("org_id", eq(org_id)), ("order", "name.asc".to_string())],
        )
    }
}
