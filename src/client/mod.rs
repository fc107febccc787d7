//! Request client.
//!
//! Keep the public surface small: [`RequestClient`] and its builder, the two
//! response contracts, and the one-shot [`send`] helper. Header merging and
//! body preparation are private to this module.

pub mod builder;
pub mod contract;
pub mod core;
mod headers;
pub mod normalize;
mod oneshot;

pub use builder::RequestClientBuilder;
pub use contract::{
    FlatMerge, FlatResponse, ResponseContract, ResponseMode, Wrapped, WrappedResponse,
};
pub use self::core::RequestClient;
pub use headers::JSON_CONTENT_TYPE;
pub use normalize::{normalize, ContentKind, Normalized};
pub use oneshot::{send, send_authorized};
