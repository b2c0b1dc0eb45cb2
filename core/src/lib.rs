//! Synchronous client for the WieBetaaltWat expense-sharing API.
//!
//! # Overview
//! Signs in, reads lists, member balances and expenses, and creates new
//! expenses. Request building and response parsing are pure (`WbwClient`);
//! the network round-trip sits behind the [`Transport`] trait, and
//! [`SessionClient`] ties the two together around an immutable [`Session`].
//!
//! # Design
//! - `WbwClient` splits every operation into `build_*` (produces request)
//!   and `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Inbound JSON is decoded into typed envelopes; a shape mismatch is
//!   `ApiError::MalformedResponse`, never a panic.
//! - Money stays in integer cents ([`Money`]) until it is displayed.
//! - Lookups that find nothing return `None`; only transport and status
//!   failures are errors.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod lookup;
pub mod money;
pub mod session;
pub mod session_client;
pub mod transport;
pub mod types;
mod wire;

pub use client::WbwClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use money::{to_euro, Money};
pub use session::{Credentials, Session, SESSION_COOKIE};
pub use session_client::SessionClient;
pub use transport::{Transport, UreqTransport};
pub use types::{Expense, ExpenseList, ExpenseShare, Member, MemberRef, NewExpense};
