//! Combine several futures into one.
//!
//! The aggregate future only observes its inputs; it never settles or
//! cancels them. Inputs that settle after the aggregate has settled are
//! ignored.

use std::cell::RefCell;
use std::rc::Rc;
use crate::error::AggregateError;
use super::{future, Future, Resolve};

/// Fulfills with every input's value, in input order, once all inputs have
/// fulfilled. Rejects with the reason of the first input to reject.
pub fn all<T, E, I>(futures: I) -> Future<Vec<T>, E>
    where T: Clone + 'static,
          E: Clone + 'static,
          I: IntoIterator<Item = Future<T, E>>,
{
    let futures: Vec<_> = futures.into_iter().collect();
    let (aggregate, c) = future();

    if futures.is_empty() {
        c.complete(vec![]);
        return aggregate;
    }

    let slots = Rc::new(RefCell::new(Slots::new(futures.len())));

    for (i, f) in futures.into_iter().enumerate() {
        let ok = c.clone();
        let err = c.clone();
        let slots = slots.clone();

        f.then(
            move |val| {
                let done = slots.borrow_mut().fill(i, val);

                if let Some(vals) = done {
                    trace!("all; every input fulfilled");
                    ok.complete(vals);
                }

                Ok(Resolve::Value(()))
            },
            move |reason| {
                err.fail(reason);
                Ok(Resolve::Value(()))
            });
    }

    aggregate
}

/// Fulfills with the value of the first input to fulfill. Rejects only once
/// every input has rejected, with all of their reasons.
///
/// With no inputs the returned future is rejected right away with an empty
/// `AggregateError`.
pub fn any<T, E, I>(futures: I) -> Future<T, AggregateError<E>>
    where T: Clone + 'static,
          E: Clone + 'static,
          I: IntoIterator<Item = Future<T, E>>,
{
    let futures: Vec<_> = futures.into_iter().collect();
    let (aggregate, c) = future();

    if futures.is_empty() {
        c.fail(AggregateError::new(vec![]));
        return aggregate;
    }

    let slots = Rc::new(RefCell::new(Slots::new(futures.len())));

    for (i, f) in futures.into_iter().enumerate() {
        let ok = c.clone();
        let err = c.clone();
        let slots = slots.clone();

        f.then(
            move |val| {
                ok.complete(val);
                Ok(Resolve::Value(()))
            },
            move |reason| {
                let done = slots.borrow_mut().fill(i, reason);

                if let Some(reasons) = done {
                    trace!("any; every input rejected");
                    err.fail(AggregateError::new(reasons));
                }

                Ok(Resolve::Value(()))
            });
    }

    aggregate
}

/// Settles the same way as the first input to settle.
///
/// With no inputs the returned future stays pending.
pub fn race<T, E, I>(futures: I) -> Future<T, E>
    where T: Clone + 'static,
          E: Clone + 'static,
          I: IntoIterator<Item = Future<T, E>>,
{
    let (aggregate, c) = future();

    for f in futures {
        let ok = c.clone();
        let err = c.clone();

        f.then(
            move |val| {
                ok.complete(val);
                Ok(Resolve::Value(()))
            },
            move |reason| {
                err.fail(reason);
                Ok(Resolve::Value(()))
            });
    }

    aggregate
}

// Positional results, collected until every slot is filled.
struct Slots<T> {
    vals: Vec<Option<T>>,
    remaining: usize,
}

impl<T> Slots<T> {
    fn new(len: usize) -> Slots<T> {
        Slots {
            vals: (0..len).map(|_| None).collect(),
            remaining: len,
        }
    }

    // Stores the value for slot `i`. Returns all values once the last slot
    // has been filled.
    fn fill(&mut self, i: usize, val: T) -> Option<Vec<T>> {
        if self.vals[i].is_some() {
            return None;
        }

        self.vals[i] = Some(val);
        self.remaining -= 1;

        if self.remaining > 0 {
            return None;
        }

        Some(self.vals.drain(..).flatten().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::future::State;

    #[test]
    pub fn test_all_empty() {
        let f = all(Vec::<Future<u32, ()>>::new());

        assert_eq!(f.try_take(), Some(Ok(vec![])));
    }

    #[test]
    pub fn test_all_keeps_input_order() {
        let (a, ac) = future::<u32, ()>();
        let (b, bc) = future::<u32, ()>();
        let (c, cc) = future::<u32, ()>();

        let f = all(vec![a, b, c]);

        cc.complete(3);
        ac.complete(1);
        assert!(f.is_pending());

        bc.complete(2);
        assert_eq!(f.try_take(), Some(Ok(vec![1, 2, 3])));
    }

    #[test]
    pub fn test_all_rejects_on_first_rejection() {
        let (a, ac) = future::<u32, &'static str>();
        let (b, bc) = future::<u32, &'static str>();

        let f = all(vec![a, b]);

        bc.fail("b");
        ac.fail("a");

        assert_eq!(f.try_take(), Some(Err("b")));
    }

    #[test]
    pub fn test_any_empty_rejects() {
        let f = any(Vec::<Future<u32, ()>>::new());

        match f.try_take() {
            Some(Err(e)) => assert!(e.is_empty()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    pub fn test_any_collects_reasons_by_position() {
        let (a, ac) = future::<u32, &'static str>();
        let (b, bc) = future::<u32, &'static str>();

        let f = any(vec![a, b]);

        bc.fail("y");
        assert!(f.is_pending());

        ac.fail("x");
        assert_eq!(f.try_take(), Some(Err(AggregateError::new(vec!["x", "y"]))));
    }

    #[test]
    pub fn test_any_first_fulfilled_wins() {
        let (a, ac) = future::<u32, ()>();
        let (b, bc) = future::<u32, ()>();

        let f = any(vec![a, b]);

        bc.complete(2);
        ac.complete(1);

        assert_eq!(f.try_take(), Some(Ok(2)));
    }

    #[test]
    pub fn test_race_empty_stays_pending() {
        let f = race(Vec::<Future<u32, ()>>::new());

        assert_eq!(f.state(), State::Pending);
    }

    #[test]
    pub fn test_race_follows_first_rejection() {
        let (a, ac) = future::<u32, &'static str>();
        let (b, bc) = future::<u32, &'static str>();

        let f = race(vec![a, b]);

        bc.fail("b");
        ac.complete(1);

        assert_eq!(f.try_take(), Some(Err("b")));
    }

    #[test]
    pub fn test_slots_ignore_refill() {
        let mut slots = Slots::new(2);

        assert_eq!(slots.fill(0, 'a'), None);
        assert_eq!(slots.fill(0, 'b'), None);
        assert_eq!(slots.fill(1, 'c'), Some(vec!['a', 'c']));
    }
}
