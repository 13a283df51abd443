//! # Bid Trace
//! This crate correlates the requests of one logical operation across the
//! services of a mesh. Every hop gets a [`context::TraceContext`] holding
//! three ids: the entry id of the first hop, the id of the calling hop and
//! its own id. The ids travel between services in http headers.
//!
//! ## Setup
//! Logging can be set up using [`setup::setup`]. This should be the first
//! call of any server binary.
//!
//! ## Http Trace Propagation
//! [`http_injector`] provides functions for injecting and extracting the
//! trace ids into/from [`http::Request`]s.
//!
//! When using [`tower`] based http frameworks like [`axum`](https://docs.rs/axum/latest/axum), the middleware [`middleware::tower::TraceLayer`] can
//! be used to derive the context of every inbound request and bind it to the
//! request, where handlers find it through [`scope::TraceCarrier`]. The
//! `actix` feature provides the same for actix-web.
//!
//! Generally, the middleware should be used on every http route, this usually
//! means that it can be registered globally and in the last position, to be the
//! first to run.
//!
//! A handler calling another service passes its context on with
//! [`http_injector::inject_trace_context_into_request`].

pub mod context;
pub mod error;
pub mod http_injector;
pub mod middleware;
pub mod scope;
pub mod setup;
pub mod trace_id;

pub use context::TraceContext;
pub use error::{Error, Result};
pub use scope::TraceCarrier;
