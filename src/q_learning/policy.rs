//! ε-greedy action selection over a [`QTable`].

use rand::Rng;

use crate::{
    q_learning::q_table::QTable,
    types::{ACTION_COUNT, Action, DiscreteState},
};

/// Which branch of the ε-greedy rule produced an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Uniform random action because the exploration draw fell below ε.
    Explore(Action),
    /// Greedy action of a seen state.
    Exploit(Action),
    /// Uniform random action because the state has never been seen.
    Unseen(Action),
}

impl Selection {
    pub fn action(self) -> Action {
        match self {
            Selection::Explore(action) | Selection::Exploit(action) | Selection::Unseen(action) => {
                action
            }
        }
    }
}

/// Uniformly random action.
pub fn random_action<R: Rng + ?Sized>(rng: &mut R) -> Action {
    Action::ALL[rng.random_range(0..ACTION_COUNT)]
}

/// ε-greedy selection reporting which branch was taken.
///
/// One draw decides explore vs exploit; a second draw picks the action when
/// exploring or when the state is unseen.
pub fn select<R: Rng + ?Sized>(
    state: &DiscreteState,
    table: &QTable,
    epsilon: f64,
    rng: &mut R,
) -> Selection {
    if rng.random::<f64>() < epsilon {
        return Selection::Explore(random_action(rng));
    }
    match table.greedy_action(state) {
        Some(action) => Selection::Exploit(action),
        None => Selection::Unseen(random_action(rng)),
    }
}

/// ε-greedy action selection
pub fn select_action<R: Rng + ?Sized>(
    state: &DiscreteState,
    table: &QTable,
    epsilon: f64,
    rng: &mut R,
) -> Action {
    select(state, table, epsilon, rng).action()
}
