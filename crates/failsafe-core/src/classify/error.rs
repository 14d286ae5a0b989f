//! Errors raised while registering failure categories.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    /// The category already has a node in the hierarchy.
    #[error("failure category `{0}` is already registered")]
    AlreadyRegistered(&'static str),
    /// `derive` named a parent that was never registered.
    #[error("cannot derive `{child}` from unregistered category `{parent}`")]
    UnknownParent {
        child: &'static str,
        parent: &'static str,
    },
}
