use std::{
    collections::{
        btree_map,
        BTreeMap,
    },
    fmt::Display,
    fs::File,
    io::{
        BufReader,
        BufWriter,
        Write,
    },
    path::Path,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    error::KuhnError,
    game::{
        Action,
        InfoSetKey,
    },
    regret::{
        normalize,
        ActionVector,
        StrategySumTable,
        UNIFORM,
    },
};

/// Action probabilities per information set, ordered by key.
///
/// Serializes as a JSON object mapping each key to `[p_pass, p_bet]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyProfile {
    strategies: BTreeMap<InfoSetKey, ActionVector>,
}

impl StrategyProfile {
    /// Time-averaged strategy of every information set present in `strategy_sum`.
    pub fn from_strategy_sums(strategy_sum: &StrategySumTable) -> Self {
        let strategies =
            strategy_sum.iter().map(|(key, sum)| (key.clone(), normalize(sum))).collect();
        Self {
            strategies,
        }
    }

    pub fn get(&self, key: &InfoSetKey) -> Option<&ActionVector> {
        self.strategies.get(key)
    }

    /// Unvisited information sets are played uniformly.
    pub fn get_or_uniform(&self, key: &InfoSetKey) -> ActionVector {
        self.strategies.get(key).copied().unwrap_or(UNIFORM)
    }

    pub fn insert(&mut self, key: InfoSetKey, strategy: ActionVector) {
        self.strategies.insert(key, strategy);
    }

    pub fn iter(&self) -> btree_map::Iter<'_, InfoSetKey, ActionVector> {
        self.strategies.iter()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn save(&self, path: &Path) -> Result<(), KuhnError> {
        let mut w = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut w, self)?;
        w.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, KuhnError> {
        let r = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(r)?)
    }
}

impl FromIterator<(InfoSetKey, ActionVector)> for StrategyProfile {
    fn from_iter<T: IntoIterator<Item = (InfoSetKey, ActionVector)>>(iter: T) -> Self {
        Self {
            strategies: iter.into_iter().collect(),
        }
    }
}

impl Display for StrategyProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, s) in self.iter() {
            writeln!(
                f,
                "{:12} {:5}: {:.4}, {:5}: {:.4}",
                key.as_str(),
                Action::Pass,
                s[Action::Pass.index()],
                Action::Bet,
                s[Action::Bet.index()]
            )?;
        }
        Ok(())
    }
}
