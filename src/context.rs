use std::fmt;

use crate::{
    error::{Error, Result},
    trace_id,
};

/// Identity of one hop in a lineage of requests.
///
/// `entry_id` names the first hop and is carried unchanged through the whole
/// lineage, `previous_id` names the hop that called this one and
/// `current_id` names this hop. A context is never mutated, advancing the
/// lineage produces a new value via [`TraceContext::chain`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TraceContext {
    entry_id: String,
    previous_id: String,
    current_id: String,
}

/// Returns whether `context` is present and valid.
pub fn is_valid(context: Option<&TraceContext>) -> bool {
    context.is_some_and(TraceContext::is_valid)
}

impl TraceContext {
    /// Builds a context from raw ids without checking them, e.g. as read from
    /// inbound headers. Check [`TraceContext::is_valid`] before relying on it.
    pub fn from_parts(
        entry_id: impl Into<String>,
        previous_id: impl Into<String>,
        current_id: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            previous_id: previous_id.into(),
            current_id: current_id.into(),
        }
    }

    /// Starts a new lineage: entry and current id are the same fresh id and
    /// there is no previous hop.
    pub fn new_origin() -> Self {
        let id = trace_id::generate();
        Self {
            entry_id: id.clone(),
            previous_id: String::new(),
            current_id: id,
        }
    }

    /// Advances the lineage by one hop.
    ///
    /// The entry id is kept, this hop's current id becomes the previous id and
    /// the new hop gets a fresh current id.
    pub fn chain(&self) -> Result<Self> {
        if !self.is_valid() {
            return Err(Error::InvalidParentContext);
        }

        Ok(Self {
            entry_id: self.entry_id.clone(),
            previous_id: self.current_id.clone(),
            current_id: trace_id::generate(),
        })
    }

    // both entry and current id must exist, previous is empty at the origin
    pub fn is_valid(&self) -> bool {
        !self.current_id.is_empty() && !self.entry_id.is_empty()
    }

    pub fn is_origin(&self) -> bool {
        self.is_valid() && self.previous_id.is_empty()
    }

    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    pub fn previous_id(&self) -> &str {
        &self.previous_id
    }

    pub fn current_id(&self) -> &str {
        &self.current_id
    }
}

impl fmt::Display for TraceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.entry_id, self.previous_id, self.current_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity() {
        assert!(!is_valid(None));
        assert!(!TraceContext::default().is_valid());
        assert!(!TraceContext::from_parts("E", "P", "").is_valid());
        assert!(!TraceContext::from_parts("", "P", "C").is_valid());
        assert!(TraceContext::from_parts("E", "", "C").is_valid());
        assert!(is_valid(Some(&TraceContext::from_parts("E", "P", "C"))));
    }

    #[test]
    fn origin_starts_a_lineage() {
        let origin = TraceContext::new_origin();

        assert!(origin.is_valid());
        assert!(origin.is_origin());
        assert!(!origin.current_id().is_empty());
        assert_eq!(origin.entry_id(), origin.current_id());
        assert_eq!(origin.previous_id(), "");
    }

    #[test]
    fn origins_are_distinct() {
        assert_ne!(
            TraceContext::new_origin().current_id(),
            TraceContext::new_origin().current_id()
        );
    }

    #[test]
    fn chain_advances_one_hop() {
        let parent = TraceContext::from_parts("E", "P", "C");
        let child = parent.chain().unwrap();

        assert_eq!(child.entry_id(), "E");
        assert_eq!(child.previous_id(), "C");
        assert_ne!(child.current_id(), "C");
        assert_ne!(child.current_id(), "E");
        assert!(child.is_valid());
        assert!(!child.is_origin());
    }

    #[test]
    fn chain_keeps_entry_id_across_lineage() {
        let origin = TraceContext::new_origin();
        let second = origin.chain().unwrap();
        let third = second.chain().unwrap();

        assert_eq!(third.entry_id(), origin.entry_id());
        assert_eq!(third.previous_id(), second.current_id());
        assert_eq!(second.previous_id(), origin.current_id());
    }

    #[test]
    fn chain_rejects_invalid_parent() {
        assert_eq!(
            TraceContext::from_parts("", "P", "C").chain(),
            Err(Error::InvalidParentContext)
        );
        assert_eq!(
            TraceContext::from_parts("E", "P", "").chain(),
            Err(Error::InvalidParentContext)
        );
    }

    #[test]
    fn display() {
        let context = TraceContext::from_parts("E", "", "C");
        assert_eq!(context.to_string(), "E//C");
    }
}
