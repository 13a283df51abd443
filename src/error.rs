use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures of the trace context model.
///
/// Both variants are recoverable: the middleware answers them by starting a
/// fresh lineage, so they never reach the client as an http error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A context without a current or entry id was about to be bound to a
    /// request.
    #[error("invalid trace context: both current and entry id must be set")]
    InvalidContext,

    /// A hop was chained from a context without a current or entry id.
    #[error("invalid parent trace context: both current and entry id must be set")]
    InvalidParentContext,
}
