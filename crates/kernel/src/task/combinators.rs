// SPDX-License-Identifier: MIT

//! The eleven task combinators of spec.md §4.3, each a [`TaskBody`] adapter
//! composing other bodies. `race` and `all` advance every sub-body one step
//! each per outer yield, in stable (registration) order, preserving the
//! single-threaded assumption (§4.3: "never by host-level concurrency
//! primitives").

use super::body::{BodyFactory, BoxedBody, Poll, StepCx, TaskBody};
use serde_json::Value;

/// `wait_ticks(n)`: completes after exactly `n` steps.
pub fn wait_ticks(n: u32) -> BoxedBody {
    struct WaitTicks {
        remaining: u32,
    }
    impl TaskBody for WaitTicks {
        fn step(&mut self, _cx: &mut StepCx<'_>) -> Poll {
            if self.remaining == 0 {
                return Poll::Ready(Value::Null);
            }
            self.remaining -= 1;
            if self.remaining == 0 {
                Poll::Ready(Value::Null)
            } else {
                Poll::Pending
            }
        }
    }
    Box::new(WaitTicks { remaining: n })
}

/// `wait_until(predicate, max_ticks)`: polls `predicate` every step; fails
/// once `max_ticks` steps have passed without it returning true.
pub fn wait_until(
    predicate: impl FnMut(&StepCx<'_>) -> bool + 'static,
    max_ticks: u32,
) -> BoxedBody {
    struct WaitUntil<P> {
        predicate: P,
        elapsed: u32,
        max_ticks: u32,
    }
    impl<P: FnMut(&StepCx<'_>) -> bool> TaskBody for WaitUntil<P> {
        fn step(&mut self, cx: &mut StepCx<'_>) -> Poll {
            if (self.predicate)(cx) {
                return Poll::Ready(Value::Bool(true));
            }
            self.elapsed += 1;
            if self.elapsed >= self.max_ticks {
                Poll::Failed("wait_until: max_ticks exceeded".to_string())
            } else {
                Poll::Pending
            }
        }
    }
    Box::new(WaitUntil {
        predicate,
        elapsed: 0,
        max_ticks,
    })
}

/// `sequence(bodies...)`: runs each body to completion before starting the
/// next; yields the array of results in order.
pub fn sequence(bodies: Vec<BoxedBody>) -> BoxedBody {
    struct Sequence {
        remaining: std::collections::VecDeque<BoxedBody>,
        current: Option<BoxedBody>,
        results: Vec<Value>,
    }
    impl TaskBody for Sequence {
        fn step(&mut self, cx: &mut StepCx<'_>) -> Poll {
            if self.current.is_none() {
                self.current = self.remaining.pop_front();
            }
            let Some(body) = self.current.as_mut() else {
                return Poll::Ready(Value::Array(std::mem::take(&mut self.results)));
            };
            match body.step(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(value) => {
                    self.results.push(value);
                    self.current = None;
                    Poll::Pending
                }
                Poll::Failed(message) => Poll::Failed(message),
            }
        }
    }
    Box::new(Sequence {
        remaining: bodies.into(),
        current: None,
        results: Vec::new(),
    })
}

fn round_robin_step(
    bodies: &mut [Option<BoxedBody>],
    results: &mut [Option<Value>],
    cx: &mut StepCx<'_>,
) -> Option<String> {
    for (body_slot, result_slot) in bodies.iter_mut().zip(results.iter_mut()) {
        if result_slot.is_some() {
            continue;
        }
        let Some(body) = body_slot.as_mut() else {
            continue;
        };
        match body.step(cx) {
            Poll::Pending => {}
            Poll::Ready(value) => {
                *result_slot = Some(value);
                *body_slot = None;
            }
            Poll::Failed(message) => return Some(message),
        }
    }
    None
}

/// `all(bodies...)`: advances every sub-body one step per outer yield;
/// completes with the array of results once every body has completed, or
/// fails as soon as any sub-body fails.
pub fn all(bodies: Vec<BoxedBody>) -> BoxedBody {
    struct All {
        bodies: Vec<Option<BoxedBody>>,
        results: Vec<Option<Value>>,
    }
    impl TaskBody for All {
        fn step(&mut self, cx: &mut StepCx<'_>) -> Poll {
            if let Some(message) = round_robin_step(&mut self.bodies, &mut self.results, cx) {
                return Poll::Failed(message);
            }
            if self.results.iter().all(Option::is_some) {
                let values = self.results.iter_mut().map(|v| v.take().unwrap_or(Value::Null)).collect();
                Poll::Ready(Value::Array(values))
            } else {
                Poll::Pending
            }
        }
    }
    let len = bodies.len();
    Box::new(All {
        bodies: bodies.into_iter().map(Some).collect(),
        results: (0..len).map(|_| None).collect(),
    })
}

/// `race(bodies...)`: advances every sub-body one step per outer yield;
/// completes with the first body to complete. A sub-body that fails before
/// any winner is found is dropped from the race; if every body fails, the
/// race fails with the last failure's message.
pub fn race(bodies: Vec<BoxedBody>) -> BoxedBody {
    struct Race {
        bodies: Vec<Option<BoxedBody>>,
    }
    impl TaskBody for Race {
        fn step(&mut self, cx: &mut StepCx<'_>) -> Poll {
            let mut last_failure = None;
            let mut still_running = false;
            for slot in &mut self.bodies {
                let Some(body) = slot.as_mut() else { continue };
                match body.step(cx) {
                    Poll::Pending => still_running = true,
                    Poll::Ready(value) => return Poll::Ready(value),
                    Poll::Failed(message) => {
                        last_failure = Some(message);
                        *slot = None;
                    }
                }
            }
            if still_running {
                Poll::Pending
            } else {
                Poll::Failed(last_failure.unwrap_or_else(|| "race: all bodies failed".to_string()))
            }
        }
    }
    Box::new(Race {
        bodies: bodies.into_iter().map(Some).collect(),
    })
}

/// `retry(factory, max_retries, delay_ticks)`: on failure, waits
/// `delay_ticks` then runs a fresh instance from `factory`, up to
/// `max_retries` attempts total.
pub fn retry(mut factory: BodyFactory, max_retries: u32, delay_ticks: u32) -> BoxedBody {
    enum Phase {
        Running(BoxedBody),
        Waiting(u32),
    }
    struct Retry {
        factory: BodyFactory,
        phase: Phase,
        attempts: u32,
        max_retries: u32,
        delay_ticks: u32,
    }
    impl TaskBody for Retry {
        fn step(&mut self, cx: &mut StepCx<'_>) -> Poll {
            match &mut self.phase {
                Phase::Waiting(remaining) => {
                    if *remaining == 0 {
                        self.phase = Phase::Running((self.factory)());
                        Poll::Pending
                    } else {
                        *remaining -= 1;
                        Poll::Pending
                    }
                }
                Phase::Running(body) => match body.step(cx) {
                    Poll::Pending => Poll::Pending,
                    Poll::Ready(value) => Poll::Ready(value),
                    Poll::Failed(message) => {
                        self.attempts += 1;
                        if self.attempts >= self.max_retries {
                            Poll::Failed(message)
                        } else {
                            self.phase = Phase::Waiting(self.delay_ticks);
                            Poll::Pending
                        }
                    }
                },
            }
        }
    }
    let first = factory();
    Box::new(Retry {
        factory,
        phase: Phase::Running(first),
        attempts: 0,
        max_retries,
        delay_ticks,
    })
}

/// `timeout(body, ticks)`: fails if `body` has not completed within `ticks`
/// steps.
pub fn timeout(body: BoxedBody, ticks: u32) -> BoxedBody {
    struct Timeout {
        body: BoxedBody,
        elapsed: u32,
        ticks: u32,
    }
    impl TaskBody for Timeout {
        fn step(&mut self, cx: &mut StepCx<'_>) -> Poll {
            match self.body.step(cx) {
                Poll::Ready(value) => Poll::Ready(value),
                Poll::Failed(message) => Poll::Failed(message),
                Poll::Pending => {
                    self.elapsed += 1;
                    if self.elapsed >= self.ticks {
                        Poll::Failed("timeout".to_string())
                    } else {
                        Poll::Pending
                    }
                }
            }
        }
    }
    Box::new(Timeout {
        body,
        elapsed: 0,
        ticks,
    })
}

/// `repeat(factory, n)`: runs `n` fresh instances from `factory` in
/// sequence, collecting their results.
pub fn repeat(mut factory: BodyFactory, n: u32) -> BoxedBody {
    let bodies = (0..n).map(|_| factory()).collect();
    sequence(bodies)
}

/// `whilst(predicate, factory)`: while `predicate` holds, runs a fresh body
/// from `factory` to completion, then re-checks `predicate`; completes with
/// the array of accumulated results once `predicate` is false.
pub fn whilst(
    predicate: impl FnMut(&StepCx<'_>) -> bool + 'static,
    factory: BodyFactory,
) -> BoxedBody {
    struct Whilst<P> {
        predicate: P,
        factory: BodyFactory,
        current: Option<BoxedBody>,
        results: Vec<Value>,
    }
    impl<P: FnMut(&StepCx<'_>) -> bool> TaskBody for Whilst<P> {
        fn step(&mut self, cx: &mut StepCx<'_>) -> Poll {
            if self.current.is_none() {
                if !(self.predicate)(cx) {
                    return Poll::Ready(Value::Array(std::mem::take(&mut self.results)));
                }
                self.current = Some((self.factory)());
            }
            let Some(body) = self.current.as_mut() else {
                return Poll::Pending;
            };
            match body.step(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(value) => {
                    self.results.push(value);
                    self.current = None;
                    Poll::Pending
                }
                Poll::Failed(message) => Poll::Failed(message),
            }
        }
    }
    Box::new(Whilst {
        predicate,
        factory,
        current: None,
        results: Vec::new(),
    })
}

/// `interval(factory, every_ticks, iterations)`: runs a fresh body from
/// `factory` every `every_ticks` steps, `iterations` times total.
pub fn interval(factory: BodyFactory, every_ticks: u32, iterations: u32) -> BoxedBody {
    enum Phase {
        Waiting(u32),
        Running(BoxedBody),
    }
    struct Interval {
        factory: BodyFactory,
        phase: Phase,
        every_ticks: u32,
        remaining_iterations: u32,
        results: Vec<Value>,
    }
    impl TaskBody for Interval {
        fn step(&mut self, cx: &mut StepCx<'_>) -> Poll {
            if self.remaining_iterations == 0 {
                return Poll::Ready(Value::Array(std::mem::take(&mut self.results)));
            }
            match &mut self.phase {
                Phase::Waiting(remaining) => {
                    if *remaining == 0 {
                        self.phase = Phase::Running((self.factory)());
                    } else {
                        *remaining -= 1;
                    }
                    Poll::Pending
                }
                Phase::Running(body) => match body.step(cx) {
                    Poll::Pending => Poll::Pending,
                    Poll::Failed(message) => Poll::Failed(message),
                    Poll::Ready(value) => {
                        self.results.push(value);
                        self.remaining_iterations -= 1;
                        self.phase = Phase::Waiting(self.every_ticks);
                        Poll::Pending
                    }
                },
            }
        }
    }
    Box::new(Interval {
        factory,
        phase: Phase::Waiting(0),
        every_ticks,
        remaining_iterations: iterations,
        results: Vec::new(),
    })
}

/// `map(items, body_per_item)`: runs one body per item concurrently
/// (round-robin, like `all`), collecting results in the items' original
/// order.
pub fn map<T>(items: Vec<T>, mut body_per_item: impl FnMut(&T) -> BoxedBody) -> BoxedBody {
    let bodies = items.iter().map(&mut body_per_item).collect();
    all(bodies)
}

/// `filter(items, predicate_body)`: runs one predicate body per item
/// concurrently; completes with the array of items whose predicate body
/// resolved truthy, in original order.
pub fn filter<T>(items: Vec<T>, mut predicate_per_item: impl FnMut(&T) -> BoxedBody) -> BoxedBody
where
    T: serde::Serialize + 'static,
{
    struct Filter<T> {
        items: Vec<T>,
        bodies: Vec<Option<BoxedBody>>,
        results: Vec<Option<Value>>,
    }
    impl<T: serde::Serialize> TaskBody for Filter<T> {
        fn step(&mut self, cx: &mut StepCx<'_>) -> Poll {
            if let Some(message) = round_robin_step(&mut self.bodies, &mut self.results, cx) {
                return Poll::Failed(message);
            }
            if self.results.iter().all(Option::is_some) {
                let kept: Vec<Value> = self
                    .items
                    .iter()
                    .zip(self.results.iter())
                    .filter(|(_, result)| matches!(result, Some(Value::Bool(true))))
                    .map(|(item, _)| serde_json::to_value(item).unwrap_or(Value::Null))
                    .collect();
                Poll::Ready(Value::Array(kept))
            } else {
                Poll::Pending
            }
        }
    }
    let bodies: Vec<Option<BoxedBody>> = items.iter().map(|item| Some(predicate_per_item(item))).collect();
    let len = bodies.len();
    Box::new(Filter {
        items,
        bodies,
        results: (0..len).map(|_| None).collect(),
    })
}

#[cfg(test)]
#[path = "combinators_tests.rs"]
mod tests;
