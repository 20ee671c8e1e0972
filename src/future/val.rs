//! A basic implementation of Future.
//!
//! The future and its completers share a reference counted core. The core
//! is only ever borrowed for the duration of a state change and never while
//! user code runs, so callbacks are free to touch any future, including the
//! one that is notifying them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::{fmt, mem};
use crate::run::run;

/// Creates a pending future along with the completer that settles it.
pub fn future<T, E>() -> (Future<T, E>, Completer<T, E>)
    where T: Clone + 'static,
          E: Clone + 'static,
{
    let core = Rc::new(RefCell::new(Core::new()));

    let f = Future::new_with_core(core.clone());
    let c = Completer::new(core);

    (f, c)
}

/// The observable state of a future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Pending,
    Fulfilled,
    Rejected,
}

/// What a chain handler produces when it succeeds.
///
/// Returning `Resolve::Future` makes the derived future follow the returned
/// one, so asynchronous steps can be chained without nesting.
pub enum Resolve<T, E> {
    Value(T),
    Future(Future<T, E>),
}

impl<T, E> From<Future<T, E>> for Resolve<T, E> {
    fn from(f: Future<T, E>) -> Resolve<T, E> {
        Resolve::Future(f)
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Resolve<T, E> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Resolve::Value(ref v) => fmt.debug_tuple("Value").field(v).finish(),
            Resolve::Future(ref f) => fmt.debug_tuple("Future").field(f).finish(),
        }
    }
}

pub struct Future<T, E> {
    core: Rc<RefCell<Core<T, E>>>,
}

impl<T, E> Future<T, E>
    where T: Clone + 'static,
          E: Clone + 'static,
{
    /// Creates a future and runs `init` right away with its completer.
    ///
    /// An error returned by `init` rejects the future, unless `init` already
    /// settled it.
    pub fn new<F>(init: F) -> Future<T, E>
        where F: FnOnce(Completer<T, E>) -> Result<(), E>,
    {
        let (f, c) = future();

        if let Err(err) = init(c.clone()) {
            debug!("future initializer returned an error");
            c.fail(err);
        }

        f
    }

    /// Returns a future that is already fulfilled with `val`.
    pub fn fulfilled(val: T) -> Future<T, E> {
        let (f, c) = future();
        c.complete(val);
        f
    }

    /// Returns a future that is already rejected with `err`.
    pub fn rejected(err: E) -> Future<T, E> {
        let (f, c) = future();
        c.fail(err);
        f
    }

    // Initializes a new Future with the given core
    fn new_with_core(core: Rc<RefCell<Core<T, E>>>) -> Future<T, E> {
        Future { core: core }
    }

    pub fn state(&self) -> State {
        self.core.borrow().state()
    }

    pub fn is_pending(&self) -> bool {
        self.state() == State::Pending
    }

    pub fn is_complete(&self) -> bool {
        !self.is_pending()
    }

    /// Gets a copy of the result if the future has been settled.
    pub fn try_take(&self) -> Option<Result<T, E>> {
        self.core.borrow().result.clone()
    }

    /// When the future is settled, call the supplied function with the
    /// result. If it already is, the function is called before returning.
    pub fn receive<F>(&self, cb: F)
        where F: FnOnce(Result<T, E>) + 'static,
    {
        // Only one of the two queues ever fires
        let ok = Rc::new(Cell::new(Some(cb)));
        let err = ok.clone();

        self.subscribe(
            move |val| {
                if let Some(cb) = ok.take() {
                    cb(Ok(val));
                }
            },
            move |e| {
                if let Some(cb) = err.take() {
                    cb(Err(e));
                }
            });
    }

    /// Derives a future from the outcome of this one.
    ///
    /// Whichever handler matches the outcome is called with the value or the
    /// reason. `Ok` settles the derived future through the returned
    /// [`Resolve`], `Err` rejects it.
    pub fn then<U, S, F>(&self, on_fulfilled: S, on_rejected: F) -> Future<U, E>
        where U: Clone + 'static,
              S: FnOnce(T) -> Result<Resolve<U, E>, E> + 'static,
              F: FnOnce(E) -> Result<Resolve<U, E>, E> + 'static,
    {
        let (derived, c) = future();
        let c2 = c.clone();

        self.subscribe(
            move |val| c.resolve(on_fulfilled(val)),
            move |err| c2.resolve(on_rejected(err)));

        derived
    }

    /// Like `then`, but a rejection is passed through to the derived future
    /// untouched.
    pub fn then_ok<U, S>(&self, on_fulfilled: S) -> Future<U, E>
        where U: Clone + 'static,
              S: FnOnce(T) -> Result<Resolve<U, E>, E> + 'static,
    {
        self.then(on_fulfilled, |err| Err(err))
    }

    /// Handles a rejection. A fulfilled value is passed through untouched
    /// and `on_rejected` is never called for it.
    pub fn catch<F>(&self, on_rejected: F) -> Future<T, E>
        where F: FnOnce(E) -> Result<Resolve<T, E>, E> + 'static,
    {
        self.then(|val| Ok(Resolve::Value(val)), on_rejected)
    }

    /// A derived future that settles exactly like this one.
    pub fn forward(&self) -> Future<T, E> {
        self.then(|val| Ok(Resolve::Value(val)), |err| Err(err))
    }

    // Runs the matching callback now if the future is settled, otherwise
    // queues both.
    fn subscribe<S, F>(&self, on_fulfilled: S, on_rejected: F)
        where S: FnOnce(T) + 'static,
              F: FnOnce(E) + 'static,
    {
        let result = self.core.borrow().result.clone();

        match result {
            Some(Ok(val)) => on_fulfilled(val),
            Some(Err(err)) => on_rejected(err),
            None => {
                trace!("future pending; queueing continuation");
                let mut core = self.core.borrow_mut();
                core.on_fulfilled.push(Box::new(on_fulfilled));
                core.on_rejected.push(Box::new(on_rejected));
            }
        }
    }
}

impl<T, E> Clone for Future<T, E> {
    fn clone(&self) -> Future<T, E> {
        Future { core: self.core.clone() }
    }
}

impl<T, E> fmt::Debug for Future<T, E> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self.core.try_borrow() {
            Ok(core) => fmt.debug_struct("Future").field("state", &core.state()).finish(),
            Err(_) => fmt.debug_struct("Future").finish_non_exhaustive(),
        }
    }
}

/// Settles a future. The first call to `complete` or `fail` wins, every
/// later call is ignored.
pub struct Completer<T, E> {
    core: Rc<RefCell<Core<T, E>>>,
}

impl<T, E> Completer<T, E>
    where T: Clone + 'static,
          E: Clone + 'static,
{
    // Initializes a new Completer with the given core
    fn new(core: Rc<RefCell<Core<T, E>>>) -> Completer<T, E> {
        Completer { core: core }
    }

    /// Fulfills the future with `val`.
    ///
    /// `val` is stored as is. A future passed here is not followed; return
    /// it from a chain handler for that.
    pub fn complete(&self, val: T) {
        let (callbacks, _unused) = {
            let mut core = self.core.borrow_mut();

            if core.result.is_some() {
                debug!("future already settled; ignoring value");
                return;
            }

            core.result = Some(Ok(val.clone()));
            (mem::take(&mut core.on_fulfilled), mem::take(&mut core.on_rejected))
        };

        trace!("future fulfilled; notifying {} continuations", callbacks.len());

        for cb in callbacks {
            let val = val.clone();
            run(Box::new(move || cb(val)));
        }
    }

    /// Rejects the future with `err`.
    pub fn fail(&self, err: E) {
        let (callbacks, _unused) = {
            let mut core = self.core.borrow_mut();

            if core.result.is_some() {
                debug!("future already settled; ignoring error");
                return;
            }

            core.result = Some(Err(err.clone()));
            (mem::take(&mut core.on_rejected), mem::take(&mut core.on_fulfilled))
        };

        trace!("future rejected; notifying {} continuations", callbacks.len());

        for cb in callbacks {
            let err = err.clone();
            run(Box::new(move || cb(err)));
        }
    }

    /// Settles the future from a handler's outcome, following the returned
    /// future if there is one.
    pub fn resolve(&self, res: Result<Resolve<T, E>, E>) {
        match res {
            Ok(Resolve::Value(val)) => self.complete(val),
            Ok(Resolve::Future(f)) => {
                let ok = self.clone();
                let err = self.clone();

                f.subscribe(move |val| ok.complete(val), move |e| err.fail(e));
            }
            Err(err) => self.fail(err),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.core.borrow().result.is_some()
    }
}

impl<T, E> Clone for Completer<T, E> {
    fn clone(&self) -> Completer<T, E> {
        Completer { core: self.core.clone() }
    }
}

impl<T, E> fmt::Debug for Completer<T, E> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Completer")
    }
}

type Callback<A> = Box<dyn FnOnce(A)>;

struct Core<T, E> {
    result: Option<Result<T, E>>,
    on_fulfilled: Vec<Callback<T>>,
    on_rejected: Vec<Callback<E>>,
}

impl<T, E> Core<T, E> {
    fn new() -> Core<T, E> {
        Core {
            result: None,
            on_fulfilled: vec![],
            on_rejected: vec![],
        }
    }

    fn state(&self) -> State {
        match self.result {
            None => State::Pending,
            Some(Ok(_)) => State::Fulfilled,
            Some(Err(_)) => State::Rejected,
        }
    }
}
