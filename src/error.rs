use thiserror::Error;

/// Returned by [`any`](crate::any) when every input future was rejected.
///
/// `errors()[i]` is the reason input `i` was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("all {} futures were rejected", .errors.len())]
pub struct AggregateError<E> {
    errors: Vec<E>,
}

impl<E> AggregateError<E> {
    pub fn new(errors: Vec<E>) -> AggregateError<E> {
        AggregateError { errors: errors }
    }

    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<E> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
