//! Error types for the pie-health crate.

use thiserror::Error;

/// Errors that can occur while fetching or preparing dashboard data.
#[derive(Debug, Error)]
pub enum HealthError {
    /// The configured base URL cannot be used.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    /// A default or per-request header could not be built.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Why the header was rejected.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    ClientBuild(String),

    /// The request did not complete (connect, timeout, body read).
    #[error("request to {url} failed: {reason}")]
    Request {
        /// Full request URL.
        url: String,
        /// Transport failure description.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} returned {status}: {body}")]
    Status {
        /// Full request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response from {url}: {reason}")]
    Decode {
        /// Full request URL.
        url: String,
        /// Decoder message.
        reason: String,
    },

    /// The parallel sample sequences of a row have different lengths.
    #[error(
        "misaligned samples for {model}: latencies={latencies}, formatted={formatted}, ratings={ratings}, states={states}"
    )]
    MisalignedSamples {
        /// Model identifier of the offending row.
        model: String,
        /// Length of `latencies`.
        latencies: usize,
        /// Length of `latenciesFormatted`.
        formatted: usize,
        /// Length of `latenciesRating`.
        ratings: usize,
        /// Length of `states`.
        states: usize,
    },

    /// A breakpoint name outside the fixed table.
    #[error("unknown breakpoint: {0}")]
    UnknownBreakpoint(String),

    /// A sort direction other than `asc`/`desc`.
    #[error("unknown sort order: {0}")]
    UnknownSortOrder(String),

    /// A chart registry was installed without a rendering backend.
    #[error("no chart renderer registered")]
    NoRenderer,

    /// A chart used a series type that was never registered.
    #[error("chart type not registered: {0}")]
    ChartNotRegistered(String),
}

/// Result type for pie-health operations.
pub type Result<T> = std::result::Result<T, HealthError>;
