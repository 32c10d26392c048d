//! Online Q-learning agent driving one paddle.
//!
//! The agent owns its transition bookkeeping. Each tick the caller asks for an
//! action with [`QLearningAgent::choose_action`], which leaves a half
//! transition pending. The caller then completes it with
//! [`QLearningAgent::record_reward`] once the consequences are known. If the
//! caller skips that step, the next `choose_action` completes the pending
//! transition with zero reward.

use std::path::Path;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error::Result,
    q_learning::{
        difficulty::{Difficulty, DifficultyProfile},
        policy::{self, Selection},
        q_table::QTable,
        serialization::{self, LoadReport},
    },
    types::{Action, DiscreteState},
};

/// State and action awaiting their reward and successor state.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingStep {
    state: DiscreteState,
    action: Action,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Not internally synchronised. Calling into the same agent from several
/// threads without external locking is a logic error.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    difficulty: Difficulty,
    profile: DifficultyProfile,
    pending: Option<PendingStep>,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create an agent with an empty table and the given difficulty.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            q_table: QTable::new(),
            difficulty,
            profile: difficulty.profile(),
            pending: None,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    /// Use a deterministic random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Reseed the random source in place.
    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    /// Override the canonical parameters of the current difficulty.
    pub fn with_profile(mut self, profile: DifficultyProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Start from an existing table.
    pub fn with_table(mut self, q_table: QTable) -> Self {
        self.q_table = q_table;
        self
    }

    /// Switch α, γ and ε to the canonical values of `difficulty`.
    ///
    /// Table contents and any pending transition are left untouched.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.profile = difficulty.profile();
        log::info!("AI difficulty set to {difficulty} ({})", self.profile);
    }

    /// Replace α, γ and ε without changing the named difficulty.
    pub fn set_profile(&mut self, profile: DifficultyProfile) {
        self.profile = profile;
        log::info!("AI learning parameters set to {profile}");
    }

    /// Pick the action for `state`.
    ///
    /// A transition still pending from the previous call is first completed
    /// with zero reward and `state` as its successor. The chosen action is
    /// then recorded as the new pending half transition.
    pub fn choose_action(&mut self, state: DiscreteState) -> Action {
        if let Some(step) = self.pending.take() {
            self.apply(step, 0.0, state);
        }

        let selection = policy::select(&state, &self.q_table, self.profile.epsilon, &mut self.rng);
        match selection {
            Selection::Explore(action) => log::trace!("explore {action} in [{state}]"),
            Selection::Exploit(action) => log::trace!("exploit {action} in [{state}]"),
            Selection::Unseen(action) => log::trace!("unseen [{state}], random {action}"),
        }

        let action = selection.action();
        self.pending = Some(PendingStep { state, action });
        action
    }

    /// Complete the pending transition with `reward` and its successor state.
    ///
    /// Returns the updated Q-value, or `None` when nothing was pending.
    pub fn record_reward(&mut self, reward: f64, resulting_state: DiscreteState) -> Option<f64> {
        let step = self.pending.take()?;
        Some(self.apply(step, reward, resulting_state))
    }

    /// Drop the pending transition without learning from it.
    pub fn discard_pending(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn apply(&mut self, step: PendingStep, reward: f64, next_state: DiscreteState) -> f64 {
        let new_q = self.q_table.q_learning_update(
            step.state,
            step.action,
            reward,
            next_state,
            self.profile.alpha,
            self.profile.gamma,
        );
        if reward != 0.0 {
            log::debug!(
                "Q-update [{}] {}: reward={reward}, q={new_q:.4}",
                step.state,
                step.action
            );
        }
        new_q
    }

    /// Save the table to `path`, returning the number of states written.
    pub fn save_table<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let count = serialization::save_to_file(&self.q_table, path.as_ref())?;
        log::info!(
            "Q-table saved to {} ({count} states)",
            path.as_ref().display()
        );
        Ok(count)
    }

    /// Save the table to `path`. Failures are logged, never raised.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> bool {
        match self.save_table(path) {
            Ok(_) => true,
            Err(err) => {
                log::error!("could not save Q-table: {err}");
                false
            }
        }
    }

    /// Replace the table with the contents of `path`.
    ///
    /// On error the current table is kept. On success any pending
    /// transition is dropped, since it refers to the replaced table.
    pub fn load_with_report<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadReport> {
        let (table, report) = serialization::load_from_file(path.as_ref())?;
        self.q_table = table;
        self.pending = None;
        log::info!(
            "Q-table loaded from {} ({} states loaded, {} errors)",
            path.as_ref().display(),
            report.states_loaded,
            report.parse_errors
        );
        Ok(report)
    }

    /// Replace the table with the contents of `path`. Failures are logged,
    /// never raised, and leave the agent usable.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> bool {
        match self.load_with_report(path) {
            Ok(_) => true,
            Err(err) => {
                log::warn!("could not load Q-table, continuing with current table: {err}");
                false
            }
        }
    }

    /// Number of states stored in the table.
    pub fn explored_state_count(&self) -> usize {
        self.q_table.size()
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> DifficultyProfile {
        self.profile
    }

    pub fn alpha(&self) -> f64 {
        self.profile.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.profile.gamma
    }

    pub fn epsilon(&self) -> f64 {
        self.profile.epsilon
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Forget everything learned and rewind the random source.
    pub fn reset(&mut self) {
        self.q_table.reset();
        self.pending = None;
        self.rng = build_rng(self.rng_seed);
    }
}

impl Default for QLearningAgent {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::types::VelocitySign;

    fn state(x: u16) -> DiscreteState {
        DiscreteState::new(x, 5, VelocitySign::Negative, VelocitySign::Positive, 3, 3)
    }

    fn greedy_agent() -> QLearningAgent {
        QLearningAgent::new(Difficulty::Easy)
            .with_profile(DifficultyProfile::custom(0.1, 0.9, 0.0).unwrap())
            .with_seed(1)
    }

    #[test]
    fn test_choose_action_leaves_pending_without_learning() {
        let mut agent = greedy_agent();
        agent.choose_action(state(2));
        assert!(agent.has_pending());
        assert_eq!(agent.explored_state_count(), 0);
    }

    #[test]
    fn test_record_reward_applies_update() {
        let mut agent = greedy_agent();
        let action = agent.choose_action(state(2));

        let new_q = agent.record_reward(10.0, state(3));

        assert_eq!(new_q, Some(1.0));
        assert!(!agent.has_pending());
        assert_eq!(agent.q_table().get(&state(2), action), 1.0);
        assert_eq!(agent.q_table().values(&state(3)), Some(&[0.0; 3]));
    }

    #[test]
    fn test_record_reward_without_pending_is_noop() {
        let mut agent = greedy_agent();
        assert_eq!(agent.record_reward(10.0, state(3)), None);
        assert_eq!(agent.explored_state_count(), 0);
    }

    #[test]
    fn test_choose_action_completes_stale_pending_with_zero_reward() {
        let mut agent = greedy_agent();
        agent.choose_action(state(2));
        agent.choose_action(state(3));

        assert!(agent.has_pending());
        let values = agent.q_table().values(&state(2)).copied().unwrap();
        assert_eq!(values, [0.0; 3]);
        assert!(agent.q_table().values(&state(3)).is_some());
    }

    #[test]
    fn test_exploits_learned_action() {
        let mut agent = greedy_agent();
        let mut table = QTable::new();
        table.insert(state(4), [0.0, 0.0, 3.0]);
        agent = agent.with_table(table);
        for _ in 0..50 {
            assert_eq!(agent.choose_action(state(4)), Action::Down);
            agent.discard_pending();
        }
    }

    #[test]
    fn test_set_difficulty_keeps_table() {
        let mut agent = greedy_agent();
        agent.choose_action(state(2));
        agent.record_reward(-20.0, state(3));
        let before = agent.q_table().clone();

        agent.set_difficulty(Difficulty::Hard);

        assert_eq!(agent.difficulty(), Difficulty::Hard);
        assert_eq!(agent.alpha(), 0.2);
        assert_eq!(agent.gamma(), 0.95);
        assert_eq!(agent.epsilon(), 0.4);
        assert_eq!(agent.q_table(), &before);
    }

    #[test]
    fn test_seeded_agents_agree() {
        let mut a = QLearningAgent::new(Difficulty::Hard).with_seed(42);
        let mut b = QLearningAgent::new(Difficulty::Hard).with_seed(42);
        for x in 0..100 {
            let s = state(x % 10);
            assert_eq!(a.choose_action(s), b.choose_action(s));
            a.record_reward(1.0, state((x + 1) % 10));
            b.record_reward(1.0, state((x + 1) % 10));
        }
        assert_eq!(a.q_table(), b.q_table());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.dat");

        let mut agent = greedy_agent();
        agent.choose_action(state(2));
        agent.record_reward(10.0, state(3));
        assert!(agent.save(&path));

        let mut restored = QLearningAgent::default();
        assert!(restored.load(&path));
        assert_eq!(restored.q_table(), agent.q_table());
        assert_eq!(restored.explored_state_count(), 2);
    }

    #[test]
    fn test_load_failure_keeps_agent_usable() {
        let dir = TempDir::new().unwrap();
        let mut agent = greedy_agent();
        agent.choose_action(state(1));
        agent.record_reward(10.0, state(2));

        assert!(!agent.load(dir.path().join("missing.dat")));
        assert_eq!(agent.explored_state_count(), 2);
        agent.choose_action(state(1));
    }

    #[test]
    fn test_save_failure_reports_false() {
        let dir = TempDir::new().unwrap();
        let agent = greedy_agent();
        let path = dir.path().join("no_such_dir").join("table.dat");
        assert!(!agent.save(path));
    }

    #[test]
    fn test_reset_rewinds_seeded_rng() {
        let mut agent = QLearningAgent::new(Difficulty::Hard).with_seed(9);
        let first: Vec<Action> = (0..20)
            .map(|x| {
                let a = agent.choose_action(state(x % 10));
                agent.discard_pending();
                a
            })
            .collect();
        agent.reset();
        let second: Vec<Action> = (0..20)
            .map(|x| {
                let a = agent.choose_action(state(x % 10));
                agent.discard_pending();
                a
            })
            .collect();
        assert_eq!(first, second);
    }
}
