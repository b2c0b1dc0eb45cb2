//! Authenticated client that drives request building, transport and parsing.
//!
//! # Design
//! `SessionClient` signs in once in its constructor and keeps the resulting
//! [`Session`] immutable. Every public method issues exactly one request
//! through the [`Transport`] and maps the reply; nothing is cached between
//! calls, so each view reflects the server state at the time of the call.

use chrono::Local;

use crate::client::WbwClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::lookup;
use crate::money::Money;
use crate::session::{Credentials, Session};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Expense, ExpenseList, Member, MemberRef, NewExpense};

/// A signed-in WieBetaaltWat client.
#[derive(Debug)]
pub struct SessionClient<T = UreqTransport> {
    api: WbwClient,
    session: Session,
    transport: T,
}

impl SessionClient<UreqTransport> {
    /// Sign in over HTTPS using `config`.
    pub fn connect(config: ClientConfig) -> Result<Self, ApiError> {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> SessionClient<T> {
    /// Establish a session over `transport`.
    ///
    /// Password credentials cost one sign-in request; a cookie is used
    /// without contacting the server.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, ApiError> {
        let api = WbwClient::new(&config.base_url, &config.api_version);
        let session = match &config.credentials {
            Credentials::Cookie(cookie) => Session::from_cookie(cookie.as_str())?,
            Credentials::Password { email, password } => {
                let request = api.build_sign_in(email, password)?;
                let session = api.parse_sign_in(transport.execute(&request)?)?;
                tracing::info!("signed in");
                session
            }
        };
        Ok(Self {
            api,
            session,
            transport,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn get_lists(&self) -> Result<Vec<ExpenseList>, ApiError> {
        let request = self.api.build_get_lists(&self.session);
        self.api.parse_get_lists(self.transport.execute(&request)?)
    }

    /// Id of the first list whose name matches `name` case-insensitively.
    pub fn get_list_by_name(&self, name: &str) -> Result<Option<String>, ApiError> {
        let lists = self.get_lists()?;
        Ok(lookup::list_by_name(&lists, name).map(|list| list.id.clone()))
    }

    pub fn get_balance(&self, list_id: &str) -> Result<Vec<Member>, ApiError> {
        let request = self.api.build_get_balance(&self.session, list_id);
        self.api.parse_get_balance(self.transport.execute(&request)?)
    }

    pub fn get_balance_user(
        &self,
        list_id: &str,
        member: MemberRef<'_>,
    ) -> Result<Option<Money>, ApiError> {
        let members = self.get_balance(list_id)?;
        Ok(lookup::find_member(&members, member).map(|m| m.balance))
    }

    pub fn get_user_id_by_nickname(
        &self,
        list_id: &str,
        nickname: &str,
    ) -> Result<Option<String>, ApiError> {
        let members = self.get_balance(list_id)?;
        Ok(lookup::member_by_nickname(&members, nickname).map(|m| m.id.clone()))
    }

    pub fn get_nickname_by_user_id(
        &self,
        list_id: &str,
        user_id: &str,
    ) -> Result<Option<String>, ApiError> {
        let members = self.get_balance(list_id)?;
        Ok(lookup::member_by_id(&members, user_id).map(|m| m.nickname.clone()))
    }

    pub fn get_expenses(&self, list_id: &str) -> Result<Vec<Expense>, ApiError> {
        let request = self.api.build_get_expenses(&self.session, list_id);
        self.api.parse_get_expenses(self.transport.execute(&request)?)
    }

    /// Create `expense` in `list_id` and return the server's 201 reply.
    pub fn add_expense(
        &self,
        list_id: &str,
        expense: &NewExpense,
    ) -> Result<HttpResponse, ApiError> {
        let today = Local::now().date_naive();
        let request = self
            .api
            .build_add_expense(&self.session, list_id, expense, today)?;
        self.api.parse_add_expense(self.transport.execute(&request)?)
    }
}
