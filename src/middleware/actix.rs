use std::{future, future::Ready};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, HeaderName, HeaderValue},
    Error, HttpMessage, HttpRequest,
};
use tracing::instrument::Instrumented;

use crate::{
    http_injector::{HttpHeaderInjector, HttpHeaderProvider},
    middleware,
    scope::{Binding, TraceCarrier},
};

/// Binds a [`TraceContext`](crate::context::TraceContext) to every request
/// and runs the route handler inside a span carrying its ids.
///
/// Generally, the middleware should be used on every http route, this usually
/// means that it can be registered globally and in the last position, to be the
/// first to run, even before general logging layers.
///
/// The `TraceLayer` will not log http requests. For that, another solution
/// needs to be added additionally.
///
/// ```ignore
/// let app = App::new()
///     .route("/foo", web::get().to(|request: HttpRequest| async move {
///         let context = request.must_trace_context();
///         HttpResponse::Ok()
///     }))
///     .wrap(TraceLayer);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceLayer;

impl<S, B> Transform<S, ServiceRequest> for TraceLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = TraceService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        future::ready(Ok(TraceService { service }))
    }
}

/// This service implements the Trace behavior
pub struct TraceService<S> {
    service: S,
}

impl<S, Body> Service<ServiceRequest> for TraceService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<Body>, Error = Error>,
    S::Future: 'static,
    Body: 'static,
{
    type Error = Error;
    type Future = Instrumented<S::Future>;
    type Response = ServiceResponse<Body>;

    // This service is ready when its next service is ready
    forward_ready!(service);

    fn call(&self, mut request: ServiceRequest) -> Self::Future {
        let context = middleware::continue_trace(&request);
        let span = middleware::request_span(&context);
        // valid by construction
        request.bind(Binding(context));

        tracing::Instrument::instrument(self.service.call(request), span)
    }
}

impl HttpHeaderProvider for HeaderMap {
    fn get(&self, key: &str) -> Option<&str> {
        HeaderMap::get(self, key).and_then(|x| x.to_str().ok())
    }
}

impl HttpHeaderProvider for HttpRequest {
    fn get(&self, key: &str) -> Option<&str> {
        HttpHeaderProvider::get(self.headers(), key)
    }
}

impl HttpHeaderProvider for ServiceRequest {
    fn get(&self, key: &str) -> Option<&str> {
        HttpHeaderProvider::get(self.headers(), key)
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

impl TraceCarrier for HttpRequest {
    fn bind(&mut self, binding: Binding) {
        HttpMessage::extensions_mut(self).insert(binding);
    }

    fn binding(&self) -> Option<Binding> {
        HttpMessage::extensions(self).get::<Binding>().cloned()
    }
}

impl TraceCarrier for ServiceRequest {
    fn bind(&mut self, binding: Binding) {
        HttpMessage::extensions_mut(self).insert(binding);
    }

    fn binding(&self) -> Option<Binding> {
        HttpMessage::extensions(self).get::<Binding>().cloned()
    }
}
