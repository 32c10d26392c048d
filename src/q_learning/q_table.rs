//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{ACTION_COUNT, Action, DiscreteState};

/// Value estimates for every action in one state, indexed by [`Action::index`].
pub type ActionValues = [f64; ACTION_COUNT];

/// Value of an action in a state that has never been stored.
pub const COLD_START_VALUE: f64 = 0.0;

/// Sparse Q-table mapping discrete states to one value per action.
///
/// Unseen states read as all zeros. Reads never insert; only updates and
/// explicit writes grow the table. Not internally synchronised: share it
/// across threads only behind your own lock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    q_values: HashMap<DiscreteState, ActionValues>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &DiscreteState, action: Action) -> f64 {
        self.q_values
            .get(state)
            .map_or(COLD_START_VALUE, |values| values[action.index()])
    }

    /// Stored value vector for a state, if the state has been seen.
    pub fn values(&self, state: &DiscreteState) -> Option<&ActionValues> {
        self.q_values.get(state)
    }

    /// Set Q-value for a state-action pair, inserting the state if needed
    pub fn set(&mut self, state: DiscreteState, action: Action, value: f64) {
        self.q_values
            .entry(state)
            .or_insert([COLD_START_VALUE; ACTION_COUNT])[action.index()] = value;
    }

    /// Replace the whole value vector of a state.
    pub fn insert(&mut self, state: DiscreteState, values: ActionValues) {
        self.q_values.insert(state, values);
    }

    /// Make sure `state` has an entry, zero-filled when absent.
    pub fn ensure(&mut self, state: DiscreteState) {
        self.q_values
            .entry(state)
            .or_insert([COLD_START_VALUE; ACTION_COUNT]);
    }

    /// Maximum Q-value in a state; zero for unseen states.
    pub fn max_q(&self, state: &DiscreteState) -> f64 {
        self.q_values
            .get(state)
            .map_or(COLD_START_VALUE, |values| {
                values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
            })
    }

    /// Greedy action for a seen state.
    ///
    /// Ties resolve to the lowest ordinal. Returns `None` for unseen states so
    /// the caller can decide how to act without information.
    pub fn greedy_action(&self, state: &DiscreteState) -> Option<Action> {
        let values = self.q_values.get(state)?;
        let mut best = Action::Stay;
        for action in Action::ALL {
            if values[action.index()] > values[best.index()] {
                best = action;
            }
        }
        Some(best)
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// The resulting state is inserted zero-filled when absent, so later
    /// lookups see it as explored. Returns the new Q(s,a).
    pub fn q_learning_update(
        &mut self,
        state: DiscreteState,
        action: Action,
        reward: f64,
        next_state: DiscreteState,
        learning_rate: f64,
        discount_factor: f64,
    ) -> f64 {
        let current_q = self.get(&state, action);
        let max_next_q = self.max_q(&next_state);
        let td_target = reward + discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + learning_rate * td_error;
        self.set(state, action, new_q);
        self.ensure(next_state);
        new_q
    }

    /// Iterate over stored states and their value vectors
    pub fn iter(&self) -> impl Iterator<Item = (&DiscreteState, &ActionValues)> {
        self.q_values.iter()
    }

    /// Reset all Q-values
    pub fn reset(&mut self) {
        self.q_values.clear();
    }

    /// Number of explored states
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }
}
