//! Deferred values for single threaded programs.
//!
//! A [`Future`] holds a value that is not known yet. Work that depends on the
//! value is registered with [`Future::then`] and friends and runs as soon as
//! the future is completed through its [`Completer`]. Several futures can be
//! combined with [`all`], [`any`] and [`race`].

#[macro_use]
extern crate log;

pub use error::AggregateError;
pub use future::{all, any, future, race, Completer, Future, Resolve, State};

pub mod future;
mod error;
mod run;
