pub use self::join::{all, any, race};
pub use self::val::{future, Completer, Future, Resolve, State};

mod join;
mod val;
