//! Client application: the single-page app's state and API calls, as a library.
//!
//! The token lives in a file standing in for browser storage; pages are view
//! models driven by `PageState`.

pub mod api;
pub mod auth;
pub mod config;
pub mod editor;
pub mod error;
pub mod forms;
pub mod pages;
pub mod routes;
pub mod storage;

pub use api::{ApiClient, DraftRequest};
pub use auth::{AuthContext, CurrentUser};
pub use config::ClientConfig;
pub use editor::{DraftFields, SaveStatus, SessionEditor};
pub use error::{ClientError, Result};
pub use pages::{Dashboard, MySessionsPage, PageState};
pub use routes::Route;
pub use storage::TokenStore;
