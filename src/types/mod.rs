//! Core request-side types shared by the client and transport.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`HttpMethod`] | The six verbs the client issues |
//! | [`RequestBody`] | Structured or opaque payload |
//! | [`RequestOptions`] | Whitelisted per-call options |

pub mod body;
pub mod method;
pub mod options;

pub use body::{MultipartField, MultipartValue, RequestBody};
pub use method::HttpMethod;
pub use options::{HeaderList, RequestOptions};
