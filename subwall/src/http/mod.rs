//! HTTP transport used by the listing fetcher and the cache store.
//!
//! [`AsyncHttpClient`] is the seam between the pipeline and the network;
//! [`ReqwestClient`] is the production implementation. All requests from
//! both pipeline phases pass through one shared [`HttpConcurrencyLimiter`].

mod client;
mod limiter;

pub use client::{
    AsyncHttpClient, BodyStream, HttpError, HttpResponse, ReqwestClient, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_USER_AGENT,
};
pub use limiter::{HttpConcurrencyLimiter, HttpPermit, LimiterClosed, DEFAULT_MAX_CONCURRENT};

#[cfg(test)]
pub use client::tests::{MockHttpClient, MockReply};
