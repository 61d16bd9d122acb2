//! HTTP access to the APIpie health API.
//!
//! [`ApiClient`] binds a base URL and default headers and offers a one-shot
//! [`ApiClient::fetch`] and an observable [`ApiClient::request`].
//! [`ApiWrapper`] builds on it to unwrap the `data` envelope the API puts
//! around every payload.
//!
//! ```text
//! ┌────────────┐  get_items/get_item  ┌───────────┐  GET {base}/{path}  ┌────────────┐
//! │ dashboard  │─────────────────────►│ ApiClient │────────────────────►│ health API │
//! └────────────┘  Vec<T> / Option<T>  └───────────┘  {"data": ...}      └────────────┘
//! ```

pub mod client;
pub mod wrapper;

pub use client::{ApiClient, FetchHandle, FetchState, RequestOptions};
pub use wrapper::{ApiWrapper, Envelope};
