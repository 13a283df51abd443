//! Request scoped storage of the [`TraceContext`].
//!
//! The context is bound to a request through a [`TraceCarrier`], which is
//! implemented for the request types of the supported frameworks. Handlers
//! read it back with [`TraceCarrier::trace_context`], or with
//! [`TraceCarrier::must_trace_context`] where the trace middleware is known
//! to run first.

use http::{request::Parts, Extensions, Request};

use crate::{
    context::TraceContext,
    error::{Error, Result},
};

/// A [`TraceContext`] bound to a request. Only this crate can create one, so
/// a binding always went through the validity check.
#[derive(Debug, Clone)]
pub struct Binding(pub(crate) TraceContext);

/// Something that lives as long as a request and can hold its trace context.
///
/// A request holds at most one context, binding again replaces it.
pub trait TraceCarrier {
    #[doc(hidden)]
    fn bind(&mut self, binding: Binding);

    #[doc(hidden)]
    fn binding(&self) -> Option<Binding>;

    /// Binds `context` to the request.
    fn embed_trace_context(&mut self, context: TraceContext) -> Result<()> {
        if !context.is_valid() {
            return Err(Error::InvalidContext);
        }
        self.bind(Binding(context));
        Ok(())
    }

    /// Returns the bound context, or `None` if there is none or it is invalid.
    fn trace_context(&self) -> Option<TraceContext> {
        self.binding()
            .map(|Binding(context)| context)
            .filter(TraceContext::is_valid)
    }

    /// Returns the bound context for code that only runs behind the trace
    /// middleware.
    ///
    /// # Panics
    ///
    /// Panics if no valid context is bound, which means the middleware is not
    /// installed in front of the caller.
    #[track_caller]
    fn must_trace_context(&self) -> TraceContext {
        match self.trace_context() {
            Some(context) => context,
            None => panic!(
                "trace context should be bound to the request, find out why it was handled \
                 without the trace middleware"
            ),
        }
    }
}

impl TraceCarrier for Extensions {
    fn bind(&mut self, binding: Binding) {
        self.insert(binding);
    }

    fn binding(&self) -> Option<Binding> {
        self.get::<Binding>().cloned()
    }
}

impl<B> TraceCarrier for Request<B> {
    fn bind(&mut self, binding: Binding) {
        self.extensions_mut().bind(binding);
    }

    fn binding(&self) -> Option<Binding> {
        self.extensions().binding()
    }
}

impl TraceCarrier for Parts {
    fn bind(&mut self, binding: Binding) {
        self.extensions.bind(binding);
    }

    fn binding(&self) -> Option<Binding> {
        self.extensions.binding()
    }
}
