use settle::{all, any, future, race, AggregateError, Future};
use super::init;

// `a` settles later, `b` and `c` are settled before being combined.
fn inputs() -> (Vec<Future<u32, &'static str>>, settle::Completer<u32, &'static str>) {
    let (a, ac) = future();
    let b = Future::fulfilled(2);
    let c = Future::rejected("err");

    (vec![a, b, c], ac)
}

#[test]
pub fn test_all_rejects_with_first_reason() {
    init();

    let (futures, a) = inputs();
    let f = all(futures);

    assert_eq!(f.try_take(), Some(Err("err")));

    a.complete(1);
    assert_eq!(f.try_take(), Some(Err("err")));
}

#[test]
pub fn test_any_fulfills_with_first_value() {
    init();

    let (futures, a) = inputs();
    let f = any(futures);

    assert_eq!(f.try_take(), Some(Ok(2)));

    a.complete(1);
    assert_eq!(f.try_take(), Some(Ok(2)));
}

#[test]
pub fn test_race_follows_input_order_when_settled() {
    init();

    let (futures, a) = inputs();
    let f = race(futures);

    assert_eq!(f.try_take(), Some(Ok(2)));

    a.complete(1);
    assert_eq!(f.try_take(), Some(Ok(2)));
}

#[test]
pub fn test_race_follows_first_to_settle_in_time() {
    init();

    let (a, ac) = future::<u32, &'static str>();
    let (b, bc) = future::<u32, &'static str>();

    let f = race(vec![a, b]);
    assert!(f.is_pending());

    bc.complete(20);
    ac.fail("late");

    assert_eq!(f.try_take(), Some(Ok(20)));
}

#[test]
pub fn test_any_all_rejected() {
    init();

    let a = Future::<u32, &'static str>::rejected("x");
    let b = Future::<u32, &'static str>::rejected("y");

    let f = any(vec![a, b]);

    match f.try_take() {
        Some(Err(e)) => {
            assert_eq!(e.errors(), &["x", "y"]);
            assert_eq!(e, AggregateError::new(vec!["x", "y"]));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
pub fn test_empty_inputs() {
    init();

    let none = Vec::<Future<u32, &'static str>>::new;

    assert_eq!(all(none()).try_take(), Some(Ok(vec![])));
    assert_eq!(any(none()).try_take(), Some(Err(AggregateError::new(vec![]))));
    assert!(race(none()).is_pending());
}

#[test]
pub fn test_all_of_chained_inputs() {
    init();

    let (a, ac) = future::<u32, &'static str>();
    let (b, bc) = future::<u32, &'static str>();

    let f = all(vec![
        a.then_ok(|v| Ok(settle::Resolve::Value(v * 10))),
        b.forward(),
    ]);

    bc.complete(2);
    ac.complete(1);

    assert_eq!(f.try_take(), Some(Ok(vec![10, 2])));
}
