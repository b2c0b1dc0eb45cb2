//! Stateless HTTP request builder and response parser for the WieBetaaltWat API.
//!
//! # Design
//! `WbwClient` holds only the base URL and API version. Each operation is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`. Authenticated builders
//! borrow a [`Session`] rather than reading it from client state, so one
//! `WbwClient` can serve any number of sessions.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::money::Money;
use crate::session::{Session, SESSION_COOKIE};
use crate::types::{Expense, ExpenseList, ExpenseShare, Member, NewExpense};
use crate::wire;

const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Request builder and response parser for the consumed API endpoints.
#[derive(Debug, Clone)]
pub struct WbwClient {
    base_url: String,
    api_version: String,
}

impl WbwClient {
    pub fn new(base_url: &str, api_version: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: api_version.to_string(),
        }
    }

    pub fn build_sign_in(&self, email: &str, password: &str) -> Result<HttpRequest, ApiError> {
        let payload = wire::SignInPayload {
            user: wire::SignInUser { email, password },
        };
        self.post("/api/users/sign_in", None, &payload)
    }

    pub fn build_get_lists(&self, session: &Session) -> HttpRequest {
        self.get("/api/lists", session)
    }

    pub fn build_get_balance(&self, session: &Session, list_id: &str) -> HttpRequest {
        self.get(&format!("/api/lists/{list_id}/balance"), session)
    }

    pub fn build_get_expenses(&self, session: &Session, list_id: &str) -> HttpRequest {
        self.get(&format!("/api/lists/{list_id}/expenses"), session)
    }

    /// Build the creation request for `expense`, booked on `today` when the
    /// expense carries no date of its own.
    pub fn build_add_expense(
        &self,
        session: &Session,
        list_id: &str,
        expense: &NewExpense,
        today: NaiveDate,
    ) -> Result<HttpRequest, ApiError> {
        let amount = Money::from_major(expense.amount);
        let payload = wire::ExpensePayload {
            expense: wire::ExpenseBody {
                name: &expense.description,
                payed_by_id: &expense.payer_id,
                payed_on: expense.date.unwrap_or(today).format("%Y-%m-%d").to_string(),
                amount,
                shares_attributes: ExpenseShare::split_evenly(amount, &expense.participant_ids),
            },
        };
        self.post(&format!("/api/lists/{list_id}/expenses"), Some(session), &payload)
    }

    pub fn parse_sign_in(&self, response: HttpResponse) -> Result<Session, ApiError> {
        if response.status != 201 {
            tracing::warn!(status = response.status, "sign-in rejected");
            return Err(ApiError::RemoteAuthentication {
                status: response.status,
                body: response.body,
            });
        }
        response
            .cookie(SESSION_COOKIE)
            .filter(|token| !token.is_empty())
            .map(Session::from_token)
            .ok_or_else(|| {
                ApiError::MalformedResponse(format!("sign-in response did not set {SESSION_COOKIE}"))
            })
    }

    pub fn parse_get_lists(&self, response: HttpResponse) -> Result<Vec<ExpenseList>, ApiError> {
        let envelope: wire::ListsEnvelope = decode(response, 200)?;
        Ok(envelope.data.into_iter().map(wire::ListEntry::into_list).collect())
    }

    pub fn parse_get_balance(&self, response: HttpResponse) -> Result<Vec<Member>, ApiError> {
        let envelope: wire::BalanceEnvelope = decode(response, 200)?;
        Ok(envelope
            .balance
            .member_totals
            .into_iter()
            .map(wire::MemberTotalEntry::into_member)
            .collect())
    }

    /// Non-deleted expenses in server order.
    pub fn parse_get_expenses(&self, response: HttpResponse) -> Result<Vec<Expense>, ApiError> {
        let envelope: wire::ExpensesEnvelope = decode(response, 200)?;
        Ok(envelope
            .data
            .into_iter()
            .map(|entry| entry.expense)
            .filter(|record| !record.is_deleted())
            .map(wire::ExpenseRecord::into_expense)
            .collect())
    }

    /// The creation endpoint's reply is handed back untouched on 201.
    pub fn parse_add_expense(&self, response: HttpResponse) -> Result<HttpResponse, ApiError> {
        check_status(&response, 201)?;
        Ok(response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn base_headers(&self, session: Option<&Session>) -> Vec<(String, String)> {
        let mut headers = vec![("accept-version".to_string(), self.api_version.clone())];
        if let Some(session) = session {
            headers.push(("cookie".to_string(), session.cookie_header().to_string()));
        }
        headers
    }

    fn get(&self, path: &str, session: &Session) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(path),
            headers: self.base_headers(Some(session)),
            body: None,
        }
    }

    fn post<T: Serialize>(
        &self,
        path: &str,
        session: Option<&Session>,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut headers = self.base_headers(session);
        headers.push(("content-type".to_string(), JSON_CONTENT_TYPE.to_string()));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url(path),
            headers,
            body: Some(body),
        })
    }
}

/// Map a status other than `expected` to `ApiError::RemoteRequest`.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    tracing::warn!(status = response.status, expected, "unexpected response status");
    Err(ApiError::RemoteRequest {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}
