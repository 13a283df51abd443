//! Per request orchestration shared by the framework middlewares.
//!
//! Every inbound request gets exactly one [`TraceContext`]: the caller's
//! lineage advanced by one hop if the caller sent one, a new lineage
//! otherwise. The context is bound to the request and the handler runs inside
//! a span carrying its ids.

#[cfg(feature = "actix")]
pub mod actix;
#[cfg(feature = "tower")]
pub mod tower;

use tracing::Span;

use crate::{
    context::TraceContext,
    http_injector::{self, HttpHeaderProvider},
};

/// Derives the context of this hop from the inbound headers.
///
/// Without an entry id a new lineage is started. A caller that sent an entry
/// id but no current id has a broken context; this is logged and a new
/// lineage is started as well.
pub fn continue_trace<H>(headers: &H) -> TraceContext
where
    H: HttpHeaderProvider + ?Sized,
{
    let candidate = http_injector::extract_trace_context(headers);
    if candidate.entry_id().is_empty() {
        return TraceContext::new_origin();
    }

    match candidate.chain() {
        Ok(context) => context,
        Err(error) => {
            tracing::warn!(
                %error,
                entry_tid = candidate.entry_id(),
                prev_tid = candidate.previous_id(),
                "inbound trace context is invalid, both current and entry id should exist; \
                 starting a new trace"
            );
            TraceContext::new_origin()
        }
    }
}

/// Span the request is handled in. Everything logged by the handler is
/// tagged with the ids of this hop.
pub fn request_span(context: &TraceContext) -> Span {
    tracing::info_span!(
        "request",
        entry_tid = context.entry_id(),
        prev_tid = context.previous_id(),
        curr_tid = context.current_id(),
    )
}
