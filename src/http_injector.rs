use http::{request::Parts, HeaderMap, HeaderName, HeaderValue, Request};

use crate::{context::TraceContext, middleware};

/// Header carrying the id of the hop that sends the request.
pub const X_CURR_TID: &str = "x-curr-tid";
/// Header carrying the id of the hop before the sender, omitted at the origin.
pub const X_PREV_TID: &str = "x-prev-tid";
/// Header carrying the id of the first hop of the lineage.
pub const X_ENTRY_TID: &str = "x-entry-tid";

/// Read access to the headers of a request, independent of the http
/// framework. Lookups are case-insensitive.
pub trait HttpHeaderProvider {
    /// Returns the first value of `key`, or `None` if it is missing or not
    /// visible ascii.
    fn get(&self, key: &str) -> Option<&str>;
}

/// Write access to the headers of an outgoing request.
pub trait HttpHeaderInjector {
    /// Replaces every value of `key` with `value`. Values that are not legal
    /// header values are skipped.
    fn set(&mut self, key: &'static str, value: &str);

    /// Removes every value of `key`.
    fn remove(&mut self, key: &'static str);
}

/// Reads the trace ids sent by the caller. Missing headers read as empty ids,
/// so the result may be invalid.
pub fn extract_trace_context<H>(headers: &H) -> TraceContext
where
    H: HttpHeaderProvider + ?Sized,
{
    let read = |key: &str| headers.get(key).unwrap_or_default();
    TraceContext::from_parts(read(X_ENTRY_TID), read(X_PREV_TID), read(X_CURR_TID))
}

/// Writes `context` onto the headers of a downstream call.
///
/// The previous id is only written if there is one, otherwise a previous id
/// already present in `headers` is removed. A context without an entry id
/// announces its current id as the entry id.
pub fn inject_trace_context<I>(context: &TraceContext, headers: &mut I)
where
    I: HttpHeaderInjector + ?Sized,
{
    if context.previous_id().is_empty() {
        headers.remove(X_PREV_TID);
    } else {
        headers.set(X_PREV_TID, context.previous_id());
    }

    if context.entry_id().is_empty() {
        headers.set(X_ENTRY_TID, context.current_id());
    } else {
        headers.set(X_ENTRY_TID, context.entry_id());
    }

    headers.set(X_CURR_TID, context.current_id());
}

/// Injects `context` into a [`Request`]s headers to allow propagation
/// downstream.
pub fn inject_trace_context_into_request<'r, T>(
    context: &TraceContext,
    request: &'r mut Request<T>,
) -> &'r mut Request<T> {
    inject_trace_context(context, request.headers_mut());
    request
}

/// Derives the context of this hop from [`Request`] headers, continuing the
/// caller's lineage or starting a new one.
pub fn extract_trace_context_from_request<T>(request: &Request<T>) -> TraceContext {
    middleware::continue_trace(request)
}

impl HttpHeaderProvider for HeaderMap {
    fn get(&self, key: &str) -> Option<&str> {
        HeaderMap::get(self, key).and_then(|value| value.to_str().ok())
    }
}

impl<T> HttpHeaderProvider for Request<T> {
    fn get(&self, key: &str) -> Option<&str> {
        HttpHeaderProvider::get(self.headers(), key)
    }
}

impl HttpHeaderProvider for Parts {
    fn get(&self, key: &str) -> Option<&str> {
        HttpHeaderProvider::get(&self.headers, key)
    }
}

impl HttpHeaderInjector for HeaderMap {
    fn set(&mut self, key: &'static str, value: &str) {
        let Ok(value) = HeaderValue::from_str(value) else {
            tracing::debug!(%key, %value, "failed to parse header value");
            return;
        };
        self.insert(HeaderName::from_static(key), value);
    }

    fn remove(&mut self, key: &'static str) {
        HeaderMap::remove(self, key);
    }
}

impl<T> HttpHeaderInjector for Request<T> {
    fn set(&mut self, key: &'static str, value: &str) {
        HttpHeaderInjector::set(self.headers_mut(), key, value);
    }

    fn remove(&mut self, key: &'static str) {
        HttpHeaderInjector::remove(self.headers_mut(), key);
    }
}
