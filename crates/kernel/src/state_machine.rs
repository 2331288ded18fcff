// SPDX-License-Identifier: MIT

//! Config-driven finite state machine interpreter for per-worker behavior
//! (spec.md §4.4). The config is code, not data: only `current_state` and
//! `context` need to persist (spec.md §4.4 "Persistence").

use std::collections::HashMap;
use std::rc::Rc;

/// An event a state machine reacts to. `kind()` keys the lookup into a
/// state's `on` table.
pub trait Event {
    fn kind(&self) -> &str;
}

type Guard<C, E> = Box<dyn Fn(&C, &E) -> bool>;
type Action<C, E> = Box<dyn Fn(&mut C, &E)>;

/// One outgoing edge: `{target, guard?, actions?}` (spec.md §3).
pub struct Transition<C, E> {
    pub target: String,
    guard: Option<Guard<C, E>>,
    actions: Vec<Action<C, E>>,
}

impl<C, E> Transition<C, E> {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            guard: None,
            actions: Vec::new(),
        }
    }

    pub fn with_guard(mut self, guard: impl Fn(&C, &E) -> bool + 'static) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    pub fn with_action(mut self, action: impl Fn(&mut C, &E) + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }
}

/// `{on: event→transition, on_entry: actions, on_exit: actions}` for one
/// named state (spec.md §3).
pub struct StateConfig<C, E> {
    on: HashMap<String, Transition<C, E>>,
    on_entry: Vec<Action<C, E>>,
    on_exit: Vec<Action<C, E>>,
}

impl<C, E> Default for StateConfig<C, E> {
    fn default() -> Self {
        Self {
            on: HashMap::new(),
            on_entry: Vec::new(),
            on_exit: Vec::new(),
        }
    }
}

impl<C, E> StateConfig<C, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, event_kind: impl Into<String>, transition: Transition<C, E>) -> Self {
        self.on.insert(event_kind.into(), transition);
        self
    }

    pub fn on_entry(mut self, action: impl Fn(&mut C, &E) + 'static) -> Self {
        self.on_entry.push(Box::new(action));
        self
    }

    pub fn on_exit(mut self, action: impl Fn(&mut C, &E) + 'static) -> Self {
        self.on_exit.push(Box::new(action));
        self
    }
}

/// A named set of `StateConfig`s shared by every instance bound to it.
pub struct StateMachineConfig<C, E> {
    states: HashMap<String, StateConfig<C, E>>,
}

impl<C, E> Default for StateMachineConfig<C, E> {
    fn default() -> Self {
        Self { states: HashMap::new() }
    }
}

impl<C, E> StateMachineConfig<C, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, name: impl Into<String>, config: StateConfig<C, E>) -> Self {
        self.states.insert(name.into(), config);
        self
    }

    pub fn contains_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }
}

/// One running instance: `{current_state, context, bound config,
/// initial_state}` (spec.md §3). `state name always ∈ config keys` is
/// upheld by construction: `new` requires `initial_state` to exist in
/// `config`.
pub struct StateMachineInstance<C, E> {
    current_state: String,
    initial_state: String,
    context: C,
    config: Rc<StateMachineConfig<C, E>>,
}

impl<C, E: Event> StateMachineInstance<C, E> {
    pub fn new(config: Rc<StateMachineConfig<C, E>>, initial_state: impl Into<String>, context: C) -> Self {
        let initial_state = initial_state.into();
        debug_assert!(
            config.contains_state(&initial_state),
            "initial_state must be a key of config"
        );
        Self {
            current_state: initial_state.clone(),
            initial_state,
            context,
            config,
        }
    }

    /// Restores an instance from its persisted `current_state`/`context`
    /// without re-running entry actions (spec.md §4.4 "Persistence").
    pub fn restore(config: Rc<StateMachineConfig<C, E>>, current_state: impl Into<String>, context: C) -> Self {
        let current_state = current_state.into();
        Self {
            initial_state: current_state.clone(),
            current_state,
            context,
            config,
        }
    }

    pub fn current_state(&self) -> &str {
        &self.current_state
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Drive one transition. Ordering (spec.md §4.4, §8 property 5):
    /// look up the current state's config and the event's transition;
    /// evaluate the guard (a false guard produces zero effects); run
    /// `on_exit`, then `transition.actions`, then set the new state, then
    /// the new state's `on_entry`.
    pub fn send(&mut self, event: &E) {
        let Some(state_config) = self.config.states.get(&self.current_state) else {
            return;
        };
        let Some(transition) = state_config.on.get(event.kind()) else {
            return;
        };
        if let Some(guard) = &transition.guard {
            if !guard(&self.context, event) {
                return;
            }
        }

        for action in &state_config.on_exit {
            action(&mut self.context, event);
        }
        for action in &transition.actions {
            action(&mut self.context, event);
        }
        self.current_state = transition.target.clone();
        if let Some(new_state_config) = self.config.states.get(&self.current_state) {
            for action in &new_state_config.on_entry {
                action(&mut self.context, event);
            }
        }
    }
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
