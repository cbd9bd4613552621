use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    game::{
        Action,
        Game,
        InfoSetKey,
    },
    regret::ActionVector,
};

/// Information sets whose evolution is recorded: for every card, the opening decision and the
/// responses to an opening pass and to an opening bet.
pub fn tracked_info_sets<G: Game>(game: &G) -> Vec<InfoSetKey> {
    let mut keys = vec![];
    for card in game.deck() {
        keys.push(game.info_set_key(card, &[]));
        keys.push(game.info_set_key(card, &[Action::Bet]));
        keys.push(game.info_set_key(card, &[Action::Pass]));
    }
    keys
}

/// Periodic snapshots of a training run. All vectors are index-aligned with `iterations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub iterations: Vec<u64>,
    pub strategies: BTreeMap<InfoSetKey, Vec<ActionVector>>,
    pub expected_payoffs: Vec<f64>,
    pub regrets: BTreeMap<InfoSetKey, Vec<ActionVector>>,
}

/// One row of the flattened history: a single information set at a single snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub iteration: u64,
    pub info_set: String,
    pub pass_probability: f64,
    pub bet_probability: f64,
    pub pass_regret: f64,
    pub bet_regret: f64,
    pub expected_payoff: f64,
}

impl TrainingHistory {
    pub fn clear(&mut self) {
        self.iterations.clear();
        self.strategies.clear();
        self.expected_payoffs.clear();
        self.regrets.clear();
    }

    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    /// Appends one snapshot. `info_sets` yields `(key, current strategy, cumulative regret)`.
    pub fn record<I>(&mut self, iteration: u64, expected_payoff: f64, info_sets: I)
    where
        I: IntoIterator<Item = (InfoSetKey, ActionVector, ActionVector)>,
    {
        self.iterations.push(iteration);
        self.expected_payoffs.push(expected_payoff);
        for (key, strategy, regret) in info_sets {
            self.strategies.entry(key.clone()).or_default().push(strategy);
            self.regrets.entry(key).or_default().push(regret);
        }
    }

    pub fn records(&self) -> Vec<HistoryRecord> {
        let mut records = vec![];
        for (i, iteration) in self.iterations.iter().enumerate() {
            for (key, strategies) in self.strategies.iter() {
                let (Some(strategy), Some(regret), Some(expected_payoff)) = (
                    strategies.get(i),
                    self.regrets.get(key).and_then(|r| r.get(i)),
                    self.expected_payoffs.get(i),
                ) else {
                    continue;
                };
                records.push(HistoryRecord {
                    iteration: *iteration,
                    info_set: key.to_string(),
                    pass_probability: strategy[Action::Pass.index()],
                    bet_probability: strategy[Action::Bet.index()],
                    pass_regret: regret[Action::Pass.index()],
                    bet_regret: regret[Action::Bet.index()],
                    expected_payoff: *expected_payoff,
                });
            }
        }
        records
    }
}
