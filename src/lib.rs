//! # formfetch
//!
//! Small helpers for talking to JSON backends and capturing forms.
//!
//! ## Overview
//!
//! - **Request client**: [`RequestClient`] wraps a fetch-compatible
//!   [`Transport`](transport::Transport), merges headers, attaches a bearer
//!   token, serializes JSON bodies, and normalizes every response the same way.
//! - **Response contracts**: a client either returns `Result<FlatResponse>`
//!   ([`FlatMerge`], failing only on transport/decode problems) or a
//!   [`WrappedResponse`] ([`Wrapped`], never failing). The choice is part of
//!   the client's type.
//! - **Form capture**: [`FormCapture`](form::FormCapture) turns a form
//!   submission into a [`FormSnapshot`](form::FormSnapshot) and republishes it
//!   through a callback and a `form:captured` event.
//! - **Notifications**: [`NotificationPresenter`](notify::NotificationPresenter)
//!   keeps toast records for a UI to draw.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formfetch::{RequestClient, Wrapped};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> formfetch::Result<()> {
//!     let client: RequestClient = RequestClient::builder("https://api.example.com")
//!         .default_header("X-App", "demo")
//!         .logging(true)
//!         .build()?;
//!     client.set_token("secret");
//!
//!     let created = client.post("/todos", json!({"title": "Buy milk"})).await?;
//!     println!("status {} id {:?}", created.status(), created.get("id"));
//!
//!     let wrapped = RequestClient::<Wrapped>::new("https://api.example.com")?;
//!     let resp = wrapped.get("/todos/404").await;
//!     assert!(!resp.ok);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Request client, builder, normalizer, response contracts |
//! | [`transport`] | Transport trait and the reqwest-backed default |
//! | [`types`] | Methods, bodies, per-call options |
//! | [`form`] | Document model and form capture |
//! | [`notify`] | Toast notifications |
//! | [`logging`] | tracing-subscriber setup |

pub mod client;
pub mod error;
pub mod form;
pub mod logging;
pub mod notify;
pub mod transport;
pub mod types;

pub use client::{
    FlatMerge, FlatResponse, RequestClient, RequestClientBuilder, ResponseContract,
    ResponseMode, Wrapped, WrappedResponse,
};
pub use error::{Error, HeaderContext, HeaderLayer};
pub use types::{HttpMethod, MultipartField, RequestBody, RequestOptions};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
