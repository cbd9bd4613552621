use std::collections::{
    hash_map,
    HashMap,
};

use more_asserts::debug_assert_ge;

use crate::game::{
    Action,
    InfoSetKey,
};

/// One value per action, indexed by [`Action::index`].
pub type ActionVector = [f64; Action::COUNT];

pub const UNIFORM: ActionVector = [1.0 / Action::COUNT as f64; Action::COUNT];

/// Clipped regret sums at or below this are treated as "no positive regret".
pub const REGRET_EPSILON: f64 = 1e-12;

/// Regret matching: play each action in proportion to its positive cumulative regret, or
/// uniformly when no action has any.
pub fn regret_matching(regrets: &ActionVector) -> ActionVector {
    let positive = regrets.map(|r| r.max(0.0));
    let normalizing_sum: f64 = positive.iter().sum();
    if normalizing_sum <= REGRET_EPSILON {
        return UNIFORM;
    }
    positive.map(|r| r / normalizing_sum)
}

/// Lazily populated mapping from information set to a per-action accumulator.
///
/// Entries are created at zero on first mutable access and are never removed except by
/// [`ActionTable::clear`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionTable {
    entries: HashMap<InfoSetKey, ActionVector>,
}

/// Cumulative counterfactual regret per information set.
pub type RegretTable = ActionTable;

/// Cumulative reach-weighted strategy per information set.
pub type StrategySumTable = ActionTable;

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &InfoSetKey) -> Option<&ActionVector> {
        self.entries.get(key)
    }

    /// Current value, or the zero vector for an information set never touched.
    pub fn get_or_zero(&self, key: &InfoSetKey) -> ActionVector {
        self.entries.get(key).copied().unwrap_or([0.0; Action::COUNT])
    }

    pub fn entry_mut(&mut self, key: InfoSetKey) -> &mut ActionVector {
        self.entries.entry(key).or_insert([0.0; Action::COUNT])
    }

    /// Adds `weight * values` component-wise.
    pub fn accumulate(&mut self, key: InfoSetKey, weight: f64, values: &ActionVector) {
        let entry = self.entry_mut(key);
        for (acc, v) in entry.iter_mut().zip(values) {
            *acc += weight * v;
        }
    }

    pub fn iter(&self) -> hash_map::Iter<'_, InfoSetKey, ActionVector> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Normalizes an accumulated strategy sum into probabilities, uniform when nothing was added.
pub fn normalize(strategy_sum: &ActionVector) -> ActionVector {
    for s in strategy_sum {
        debug_assert_ge!(*s, 0.0);
    }
    let normalizing_sum: f64 = strategy_sum.iter().sum();
    if normalizing_sum <= 0.0 {
        return UNIFORM;
    }
    strategy_sum.map(|s| s / normalizing_sum)
}
