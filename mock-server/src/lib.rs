use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "_wbw_rails_session";
pub const API_VERSION: &str = "2";

pub const DEMO_EMAIL: &str = "alice@example.com";
pub const DEMO_PASSWORD: &str = "correct-horse";

pub const HOUSE_LIST_ID: Uuid = Uuid::from_u128(0x1001);
pub const SKI_LIST_ID: Uuid = Uuid::from_u128(0x1002);
pub const ALICE_ID: Uuid = Uuid::from_u128(0x2001);
pub const BOB_ID: Uuid = Uuid::from_u128(0x2002);
pub const CAROL_ID: Uuid = Uuid::from_u128(0x2003);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Amount {
    pub fractional: i64,
    pub currency: String,
}

impl Amount {
    pub fn eur(fractional: i64) -> Self {
        Self {
            fractional,
            currency: "EUR".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListRecord {
    pub id: Uuid,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: Uuid,
    pub nickname: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub payed_by_id: Uuid,
    pub payed_on: String,
    pub amount: Amount,
}

#[derive(Clone, Debug)]
pub struct ListState {
    pub list: ListRecord,
    pub members: Vec<(MemberRecord, i64)>,
    pub expenses: Vec<ExpenseRecord>,
}

impl ListState {
    fn has_member(&self, id: Uuid) -> bool {
        self.members.iter().any(|(m, _)| m.id == id)
    }

    /// Credit the payer and debit each share. Returns `None`, leaving every
    /// balance untouched, if any step would overflow.
    fn settle(&mut self, payer: Uuid, amount: i64, shares: &[NewShare]) -> Option<()> {
        let mut members = self.members.clone();
        let mut apply = |id: Uuid, delta: i64| -> Option<()> {
            if let Some((_, balance)) = members.iter_mut().find(|(m, _)| m.id == id) {
                *balance = balance.checked_add(delta)?;
            }
            Some(())
        };
        apply(payer, amount)?;
        for share in shares {
            let owed = share.amount.checked_mul(i64::from(share.multiplier))?;
            apply(share.member_id, owed.checked_neg()?)?;
        }
        self.members = members;
        Some(())
    }
}

/// Accounts, live sessions and lists held by the mock.
#[derive(Clone, Debug, Default)]
pub struct Store {
    pub accounts: Vec<(String, String)>,
    pub sessions: HashSet<String>,
    pub lists: Vec<ListState>,
}

impl Store {
    /// One account, a busy household list and an empty ski-trip list.
    pub fn seeded() -> Self {
        let member = |id, nickname: &str| MemberRecord {
            id,
            nickname: nickname.to_string(),
        };
        let expense = |n: u128, name: &str, status: &str, payer, cents| ExpenseRecord {
            id: Uuid::from_u128(0x3000 + n),
            name: name.to_string(),
            status: status.to_string(),
            payed_by_id: payer,
            payed_on: "2024-01-15".to_string(),
            amount: Amount::eur(cents),
        };

        Self {
            accounts: vec![(DEMO_EMAIL.to_string(), DEMO_PASSWORD.to_string())],
            sessions: HashSet::new(),
            lists: vec![
                ListState {
                    list: ListRecord {
                        id: HOUSE_LIST_ID,
                        name: "Huisgenoten".to_string(),
                    },
                    members: vec![
                        (member(ALICE_ID, "Alice"), 4500),
                        (member(BOB_ID, "Bob"), -1500),
                        (member(CAROL_ID, "Carol"), -3000),
                    ],
                    expenses: vec![
                        expense(1, "Boodschappen", "active", ALICE_ID, 4500),
                        expense(2, "Dubbel geboekt", "deleted", BOB_ID, 1200),
                        expense(3, "Nieuwe bank", "active", ALICE_ID, 123_456),
                    ],
                },
                ListState {
                    list: ListRecord {
                        id: SKI_LIST_ID,
                        name: "Skivakantie".to_string(),
                    },
                    members: vec![(member(ALICE_ID, "Alice"), 0), (member(BOB_ID, "Bob"), 0)],
                    expenses: Vec::new(),
                },
            ],
        }
    }

    fn list_mut(&mut self, id: Uuid) -> Option<&mut ListState> {
        self.lists.iter_mut().find(|l| l.list.id == id)
    }

    fn list(&self, id: Uuid) -> Option<&ListState> {
        self.lists.iter().find(|l| l.list.id == id)
    }
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub user: Credentials,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateExpenseRequest {
    pub expense: NewExpense,
}

#[derive(Deserialize)]
pub struct NewExpense {
    pub name: String,
    pub payed_by_id: Uuid,
    pub payed_on: String,
    pub amount: i64,
    #[serde(default)]
    pub shares_attributes: Vec<NewShare>,
}

#[derive(Deserialize)]
pub struct NewShare {
    pub member_id: Uuid,
    pub amount: i64,
    pub multiplier: u32,
}

pub type Db = Arc<RwLock<Store>>;

type Rejection = (StatusCode, Json<Value>);

fn reject(status: StatusCode, message: &str) -> Rejection {
    (status, Json(json!({ "error": message })))
}

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/users/sign_in", post(sign_in))
        .route("/api/lists", get(list_lists))
        .route("/api/lists/{id}/balance", get(list_balance))
        .route(
            "/api/lists/{id}/expenses",
            get(list_expenses).post(create_expense),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn check_version(headers: &HeaderMap) -> Result<(), Rejection> {
    match headers.get("accept-version").and_then(|v| v.to_str().ok()) {
        Some(API_VERSION) => Ok(()),
        _ => Err(reject(StatusCode::NOT_ACCEPTABLE, "unsupported API version")),
    }
}

/// Session token carried in the request's `cookie` header, if any.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token)
}

fn authorize(headers: &HeaderMap, store: &Store) -> Result<(), Rejection> {
    check_version(headers)?;
    match session_token(headers) {
        Some(token) if store.sessions.contains(token) => Ok(()),
        _ => Err(reject(StatusCode::UNAUTHORIZED, "not signed in")),
    }
}

async fn sign_in(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<SignInRequest>,
) -> Response {
    if let Err(rejection) = check_version(&headers) {
        return rejection.into_response();
    }
    let mut store = db.write().await;
    let known = store
        .accounts
        .iter()
        .any(|(email, password)| *email == input.user.email && *password == input.user.password);
    if !known {
        tracing::info!(email = %input.user.email, "sign-in rejected");
        return reject(StatusCode::UNAUTHORIZED, "Invalid email or password.").into_response();
    }

    let token = Uuid::new_v4().simple().to_string();
    store.sessions.insert(token.clone());
    tracing::info!(email = %input.user.email, "signed in");
    (
        StatusCode::CREATED,
        [(
            header::SET_COOKIE,
            format!("{SESSION_COOKIE}={token}; path=/; HttpOnly"),
        )],
        Json(json!({ "user": { "email": input.user.email } })),
    )
        .into_response()
}

async fn list_lists(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, Rejection> {
    let store = db.read().await;
    authorize(&headers, &store)?;
    let data: Vec<Value> = store
        .lists
        .iter()
        .map(|l| json!({ "list": l.list }))
        .collect();
    Ok(Json(json!({ "data": data })))
}

async fn list_balance(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, Rejection> {
    let store = db.read().await;
    authorize(&headers, &store)?;
    let list = store
        .list(id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "list not found"))?;
    let member_totals: Vec<Value> = list
        .members
        .iter()
        .map(|(member, balance)| {
            json!({ "member_total": {
                "member": member,
                "balance_total": Amount::eur(*balance),
            }})
        })
        .collect();
    Ok(Json(json!({ "balance": { "member_totals": member_totals } })))
}

async fn list_expenses(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, Rejection> {
    let store = db.read().await;
    authorize(&headers, &store)?;
    let list = store
        .list(id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "list not found"))?;
    let data: Vec<Value> = list
        .expenses
        .iter()
        .map(|e| json!({ "expense": e }))
        .collect();
    Ok(Json(json!({ "data": data })))
}

async fn create_expense(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Value>), Rejection> {
    let mut store = db.write().await;
    authorize(&headers, &store)?;
    let list = store
        .list_mut(id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "list not found"))?;

    let input = input.expense;
    if !list.has_member(input.payed_by_id) {
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "payer is not a member"));
    }
    if let Some(share) = input
        .shares_attributes
        .iter()
        .find(|s| !list.has_member(s.member_id))
    {
        tracing::info!(member = %share.member_id, "share for unknown member");
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "share member is not a member"));
    }

    if list
        .settle(input.payed_by_id, input.amount, &input.shares_attributes)
        .is_none()
    {
        tracing::info!(amount = input.amount, "balance overflow");
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "amount out of range"));
    }

    let record = ExpenseRecord {
        id: Uuid::new_v4(),
        name: input.name,
        status: "active".to_string(),
        payed_by_id: input.payed_by_id,
        payed_on: input.payed_on,
        amount: Amount::eur(input.amount),
    };
    list.expenses.push(record.clone());
    tracing::info!(list = %id, expense = %record.id, "expense created");
    Ok((StatusCode::CREATED, Json(json!({ "expense": record }))))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn expense_record_serializes_to_api_shape() {
        let record = ExpenseRecord {
            id: Uuid::nil(),
            name: "Pizza".to_string(),
            status: "active".to_string(),
            payed_by_id: ALICE_ID,
            payed_on: "2024-01-15".to_string(),
            amount: Amount::eur(2400),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "Pizza");
        assert_eq!(json["status"], "active");
        assert_eq!(json["amount"]["fractional"], 2400);
        assert_eq!(json["amount"]["currency"], "EUR");
    }

    #[test]
    fn seeded_store_has_a_deleted_expense() {
        let store = Store::seeded();
        let house = store.list(HOUSE_LIST_ID).unwrap();
        assert_eq!(house.members.len(), 3);
        assert!(house.expenses.iter().any(|e| e.status == "deleted"));
    }

    #[test]
    fn overflowing_settlement_leaves_balances_untouched() {
        let mut store = Store::seeded();
        let house = store.list_mut(HOUSE_LIST_ID).unwrap();
        let before: Vec<i64> = house.members.iter().map(|(_, b)| *b).collect();

        let shares = [
            NewShare {
                member_id: BOB_ID,
                amount: 1000,
                multiplier: 1,
            },
            NewShare {
                member_id: CAROL_ID,
                amount: i64::MAX,
                multiplier: 2,
            },
        ];
        assert!(house.settle(ALICE_ID, 2000, &shares).is_none());
        assert!(house.settle(ALICE_ID, i64::MAX, &[]).is_none());

        let after: Vec<i64> = house.members.iter().map(|(_, b)| *b).collect();
        assert_eq!(after, before);
    }

    #[test]
    fn settlement_credits_payer_and_debits_shares() {
        let mut store = Store::seeded();
        let house = store.list_mut(HOUSE_LIST_ID).unwrap();
        let shares = [NewShare {
            member_id: BOB_ID,
            amount: 500,
            multiplier: 2,
        }];
        assert!(house.settle(ALICE_ID, 1000, &shares).is_some());
        let balances: Vec<i64> = house.members.iter().map(|(_, b)| *b).collect();
        assert_eq!(balances, [5500, -2500, -3000]);
    }

    #[test]
    fn session_token_is_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("locale=nl; _wbw_rails_session=abc"),
        );
        assert_eq!(session_token(&headers), Some("abc"));
    }

    #[test]
    fn session_token_missing_without_cookie() {
        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn create_expense_request_accepts_client_payload() {
        let input: CreateExpenseRequest = serde_json::from_str(&format!(
            r#"{{"expense":{{"name":"Taxi","payed_by_id":"{ALICE_ID}","payed_on":"2024-02-01",
                "amount":1250,"shares_attributes":[{{"member_id":"{BOB_ID}","amount":1250,"multiplier":1}}]}}}}"#
        ))
        .unwrap();
        assert_eq!(input.expense.amount, 1250);
        assert_eq!(input.expense.shares_attributes[0].member_id, BOB_ID);
    }

    #[test]
    fn create_expense_request_rejects_missing_payer() {
        let result: Result<CreateExpenseRequest, _> =
            serde_json::from_str(r#"{"expense":{"name":"x","payed_on":"2024-02-01","amount":1}}"#);
        assert!(result.is_err());
    }
}
