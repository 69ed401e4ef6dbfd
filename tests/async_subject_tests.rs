//! Integration tests for AsyncSubject
//!
//! Exercises the public surface only: buffering policy, late-subscriber
//! replay, termination rules, consumer isolation and awaiting the final value.

use std::{
  cell::RefCell,
  panic::{catch_unwind, AssertUnwindSafe},
  rc::Rc,
};

use futures::executor::block_on;
use rxsubject::prelude::*;

#[derive(Debug, Clone, PartialEq)]
enum Notification<Item, Err> {
  N(Item),
  R,
  T(Err),
}

use Notification::{N, R, T};

type Log<Item, Err> = Rc<RefCell<Vec<Notification<Item, Err>>>>;

/// Observer pushing every notification into a shared log.
fn recorder<'a, Item: 'a, Err: 'a>(log: &Log<Item, Err>) -> impl Observer<Item, Err> + 'a {
  let (n, t, r) = (log.clone(), log.clone(), log.clone());
  ObserverAll::new(
    move |v: Item| n.borrow_mut().push(N(v)),
    move |e: Err| t.borrow_mut().push(T(e)),
    move || r.borrow_mut().push(R),
  )
}

fn new_log<Item, Err>() -> Log<Item, Err> { Rc::new(RefCell::new(vec![])) }

#[test]
fn display_is_a_fixed_tag() {
  let subject = AsyncSubject::<i32, ()>::default();
  assert_eq!(format!("{subject}"), "AsyncSubject");
}

#[test]
fn can_be_given_to_a_source_as_its_observer() {
  let log = new_log::<i32, ()>();
  let subject = AsyncSubject::<i32, ()>::new();
  subject.clone().actual_subscribe(recorder(&log));

  create(|emitter: &mut dyn Emitter<i32, ()>| {
    for value in 1..=5 {
      emitter.next(value);
      if emitter.is_closed() {
        return;
      }
    }
    emitter.complete();
  })
  .actual_subscribe(subject.clone());

  assert_eq!(*log.borrow(), vec![N(5), R]);
}

#[test]
fn only_emits_the_last_value_on_complete() {
  let log = new_log::<&str, ()>();
  let subject = AsyncSubject::<&str, ()>::new();
  subject.clone().actual_subscribe(recorder(&log));

  subject.clone().next("foo");
  subject.clone().next("bar");
  subject.clone().complete();

  assert_eq!(*log.borrow(), vec![N("bar"), R]);
}

#[test]
fn does_not_emit_if_no_value_was_pushed() {
  let log = new_log::<&str, ()>();
  let subject = AsyncSubject::<&str, ()>::new();
  subject.clone().actual_subscribe(recorder(&log));

  subject.clone().complete();

  assert_eq!(*log.borrow(), vec![R]);
}

// Scenario A
#[test]
fn emits_the_last_value_to_late_subscribers() {
  let log = new_log::<i32, ()>();
  let subject = AsyncSubject::<i32, ()>::new();

  subject.clone().next(1);
  subject.clone().next(2);
  subject.clone().complete();
  subject.clone().actual_subscribe(recorder(&log));

  assert_eq!(*log.borrow(), vec![N(2), R]);
}

// Scenario B
#[test]
fn late_subscribers_get_only_completion_without_a_value() {
  let log = new_log::<i32, ()>();
  let subject = AsyncSubject::<i32, ()>::new();

  subject.clone().complete();
  subject.clone().actual_subscribe(recorder(&log));

  assert_eq!(*log.borrow(), vec![R]);
}

// Scenario C
#[test]
fn error_passes_through_without_the_buffered_value() {
  let log = new_log::<&str, Rc<String>>();
  let error = Rc::new("test error".to_string());
  let subject = AsyncSubject::<&str, Rc<String>>::new();
  subject.clone().actual_subscribe(recorder(&log));

  subject.clone().next("foo");
  subject.clone().error(error.clone());

  let log = log.borrow();
  assert_eq!(*log, vec![T(error.clone())]);
  // The payload is relayed as-is, not copied into a new allocation.
  let T(received) = &log[0] else { unreachable!() };
  assert!(Rc::ptr_eq(received, &error));
}

#[test]
fn error_is_replayed_to_late_subscribers() {
  let log = new_log::<&str, &str>();
  let subject = AsyncSubject::<&str, &str>::new();

  subject.clone().next("foo");
  subject.clone().error("test error");
  subject.clone().actual_subscribe(recorder(&log));

  assert_eq!(*log.borrow(), vec![T("test error")]);
}

// Scenario D
#[test]
fn does_not_emit_values_before_complete() {
  let log = new_log::<&str, ()>();
  let subject = AsyncSubject::<&str, ()>::new();
  subject.clone().actual_subscribe(recorder(&log));

  subject.clone().next("foo");
  subject.clone().next("bar");

  assert!(log.borrow().is_empty());
  assert!(subject.has_value());
  assert!(!subject.is_closed());
}

// Scenario E
#[test]
fn duplicate_complete_is_absorbed() {
  let log = new_log::<&str, ()>();
  let subject = AsyncSubject::<&str, ()>::new();
  subject.clone().actual_subscribe(recorder(&log));

  subject.clone().next("x");
  subject.clone().complete();
  subject.clone().complete();
  subject.clone().error(());

  assert_eq!(*log.borrow(), vec![N("x"), R]);
}

#[test]
fn values_after_termination_are_ignored() {
  let log = new_log::<i32, ()>();
  let subject = AsyncSubject::<i32, ()>::new();
  subject.clone().next(1);
  subject.clone().complete();
  subject.clone().next(2);

  subject.clone().actual_subscribe(recorder(&log));
  assert_eq!(*log.borrow(), vec![N(1), R]);
}

#[test]
fn buffer_one_holds_for_any_sequence_length() {
  for len in 1..=20 {
    let early = new_log::<usize, ()>();
    let late = new_log::<usize, ()>();
    let subject = AsyncSubject::<usize, ()>::new();
    subject.clone().actual_subscribe(recorder(&early));

    for v in 1..=len {
      subject.clone().next(v);
    }
    subject.clone().complete();
    subject.clone().actual_subscribe(recorder(&late));

    assert_eq!(*early.borrow(), vec![N(len), R]);
    assert_eq!(*early.borrow(), *late.borrow());
  }
}

#[test]
fn late_subscribers_match_early_ones() {
  let early = new_log::<i32, &str>();
  let subject = AsyncSubject::<i32, &str>::new();
  subject.clone().actual_subscribe(recorder(&early));
  subject.clone().next(3);
  subject.clone().error("boom");

  for _ in 0..3 {
    let late = new_log::<i32, &str>();
    subject.clone().actual_subscribe(recorder(&late));
    assert_eq!(*late.borrow(), *early.borrow());
  }
}

#[test]
fn every_subscriber_is_notified_once_in_subscription_order() {
  let order = Rc::new(RefCell::new(vec![]));
  let subject = AsyncSubject::<i32, ()>::new();
  for id in 0..3 {
    let order = order.clone();
    subject.clone().subscribe(move |v| order.borrow_mut().push((id, v)));
  }

  subject.clone().next(9);
  subject.clone().complete();

  assert_eq!(*order.borrow(), vec![(0, 9), (1, 9), (2, 9)]);
}

#[test]
fn try_subscribe_rejects_a_closed_consumer_without_side_effects() {
  struct Closed;
  impl Observer<i32, ()> for Closed {
    fn next(&mut self, _: i32) { panic!("closed consumer must not be notified") }
    fn error(self, _: ()) { panic!("closed consumer must not be notified") }
    fn complete(self) { panic!("closed consumer must not be notified") }
    fn is_closed(&self) -> bool { true }
  }

  let subject = AsyncSubject::<i32, ()>::new();
  subject.clone().next(1);

  assert_eq!(subject.try_subscribe(Closed).err(), Some(SubjectError::ObserverClosed));
  assert_eq!(subject.subscriber_count(), 0);
  assert!(!subject.is_closed());

  subject.clone().complete();
  assert!(subject.is_completed());
}

#[test]
fn unsubscribed_consumer_gets_nothing() {
  let dropped = new_log::<i32, ()>();
  let kept = new_log::<i32, ()>();
  let subject = AsyncSubject::<i32, ()>::new();

  let sub = subject.clone().actual_subscribe(recorder(&dropped));
  subject.clone().actual_subscribe(recorder(&kept));
  subject.clone().next(1);
  sub.unsubscribe();
  subject.clone().complete();

  assert!(dropped.borrow().is_empty());
  assert_eq!(*kept.borrow(), vec![N(1), R]);
}

#[test]
fn guard_unsubscribes_when_dropped() {
  let log = new_log::<i32, ()>();
  let subject = AsyncSubject::<i32, ()>::new();
  {
    let _guard = subject.clone().actual_subscribe(recorder(&log)).unsubscribe_when_dropped();
    assert_eq!(subject.subscriber_count(), 1);
  }
  assert_eq!(subject.subscriber_count(), 0);

  subject.clone().next(1);
  subject.clone().complete();
  assert!(log.borrow().is_empty());
}

#[test]
fn a_panicking_consumer_does_not_starve_the_others() {
  let after = new_log::<i32, ()>();
  let subject = AsyncSubject::<i32, ()>::new();
  subject.clone().subscribe(|_: i32| panic!("consumer failure"));
  subject.clone().actual_subscribe(recorder(&after));

  subject.clone().next(1);
  let result = catch_unwind(AssertUnwindSafe(|| subject.clone().complete()));

  assert!(result.is_err());
  assert_eq!(*after.borrow(), vec![N(1), R]);
  assert!(subject.is_completed());
}

#[test]
fn complete_from_inside_the_released_value_is_delivered_once() {
  let log = new_log::<i32, ()>();
  let subject = AsyncSubject::<i32, ()>::new();
  subject.clone().actual_subscribe(ObserverAll::new(
    {
      let subject = subject.clone();
      let log = log.clone();
      move |v| {
        log.borrow_mut().push(N(v));
        subject.clone().complete();
      }
    },
    |_: ()| {},
    {
      let log = log.clone();
      move || log.borrow_mut().push(R)
    },
  ));

  subject.clone().next(4);
  subject.clone().complete();

  assert_eq!(*log.borrow(), vec![N(4), R]);
}

#[test]
fn signal_aborts_exactly_once() {
  let subject = AsyncSubject::<i32, &str>::new();
  let fired = Rc::new(RefCell::new(0));
  let c_fired = fired.clone();
  subject.signal().on_abort(move || *c_fired.borrow_mut() += 1);

  subject.clone().next(1);
  assert!(!subject.signal().is_aborted());

  subject.clone().error("first");
  subject.clone().error("second");
  subject.clone().complete();

  assert!(subject.signal().is_aborted());
  assert_eq!(*fired.borrow(), 1);
}

#[test]
fn awaiting_resolves_to_the_final_value() {
  let subject = AsyncSubject::<&str, ()>::new();
  let early = subject.clone().into_future();
  subject.clone().next("first");
  subject.clone().next("last");
  subject.clone().complete();
  let late = subject.clone().into_future();

  assert_eq!(block_on(early), Ok(Ok("last")));
  assert_eq!(block_on(late), Ok(Ok("last")));
}

#[test]
fn awaiting_reports_empty_and_errors() {
  let empty = AsyncSubject::<i32, String>::new();
  let fut = empty.clone().into_future();
  empty.clone().complete();
  assert_eq!(block_on(fut), Err(IntoFutureError::Empty));

  let failed = AsyncSubject::<i32, String>::new();
  let fut = failed.clone().into_future();
  failed.clone().next(1);
  failed.clone().error("boom".to_string());
  assert_eq!(block_on(fut), Ok(Err("boom".to_string())));
}

#[test]
fn error_from_inside_the_released_value_is_ignored() {
  let first = new_log::<i32, &str>();
  let second = new_log::<i32, &str>();
  let subject = AsyncSubject::<i32, &str>::new();
  subject.clone().actual_subscribe(ObserverAll::new(
    {
      let subject = subject.clone();
      let first = first.clone();
      move |v| {
        first.borrow_mut().push(N(v));
        subject.clone().error("late");
      }
    },
    {
      let first = first.clone();
      move |e| first.borrow_mut().push(T(e))
    },
    {
      let first = first.clone();
      move || first.borrow_mut().push(R)
    },
  ));
  subject.clone().actual_subscribe(recorder(&second));

  subject.clone().next(7);
  subject.clone().complete();

  let late = new_log::<i32, &str>();
  subject.clone().actual_subscribe(recorder(&late));

  assert_eq!(*first.borrow(), vec![N(7), R]);
  assert_eq!(*second.borrow(), vec![N(7), R]);
  assert_eq!(*late.borrow(), vec![N(7), R]);
  assert!(subject.is_completed());
  assert!(!subject.is_errored());
}

#[test]
fn next_from_inside_the_released_value_is_dropped() {
  let extra = Rc::new("extra".to_string());
  let first = new_log::<Rc<String>, ()>();
  let second = new_log::<Rc<String>, ()>();
  let subject = AsyncSubject::<Rc<String>, ()>::new();
  subject.clone().actual_subscribe(ObserverAll::new(
    {
      let subject = subject.clone();
      let first = first.clone();
      let extra = extra.clone();
      move |v| {
        first.borrow_mut().push(N(v));
        subject.clone().next(extra.clone());
      }
    },
    |_: ()| {},
    {
      let first = first.clone();
      move || first.borrow_mut().push(R)
    },
  ));
  subject.clone().actual_subscribe(recorder(&second));

  let held = Rc::new("held".to_string());
  subject.clone().next(held.clone());
  subject.clone().complete();

  let late = new_log::<Rc<String>, ()>();
  subject.clone().actual_subscribe(recorder(&late));

  assert_eq!(*first.borrow(), vec![N(held.clone()), R]);
  assert_eq!(*second.borrow(), vec![N(held.clone()), R]);
  assert_eq!(*late.borrow(), vec![N(held.clone()), R]);
  assert!(subject.is_completed());
  // The completed consumer has been dropped, so nothing else holds `extra`.
  assert_eq!(Rc::strong_count(&extra), 1);
  assert!(subject.has_value());
}
