use log::debug;
use more_asserts::assert_gt;

use crate::{
    game::{
        player_to_act,
        Action,
        Deal,
        Game,
        InfoSetKey,
    },
    regret::{
        regret_matching,
        ActionVector,
        RegretTable,
        StrategySumTable,
    },
    strategy::StrategyProfile,
};

/// Orients a player-0 payoff to `player`'s point of view.
pub fn value_for_player(player: usize, payoff: f64) -> f64 {
    if player == 0 {
        payoff
    } else {
        -payoff
    }
}

/// A child's value belongs to the player acting there, i.e. the opponent.
pub fn counterfactual_value(child_value: f64) -> f64 {
    -child_value
}

/// Vanilla CFR over the full action tree of one deal.
///
/// The solver exclusively owns its regret and strategy-sum tables. Both grow during a training
/// run and are only read by [`Solver::average_strategy`] and [`Solver::current_strategy`].
pub struct Solver<G>
where
    G: Game,
{
    game: G,
    regret_sum: RegretTable,
    strategy_sum: StrategySumTable,
}

impl<G> Solver<G>
where
    G: Game,
{
    pub fn new(game: G) -> Self {
        Solver {
            game,
            regret_sum: RegretTable::new(),
            strategy_sum: StrategySumTable::new(),
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn reset(&mut self) {
        self.regret_sum.clear();
        self.strategy_sum.clear();
    }

    pub fn regret_table(&self) -> &RegretTable {
        &self.regret_sum
    }

    pub fn strategy_sum_table(&self) -> &StrategySumTable {
        &self.strategy_sum
    }

    /// Regret-matched strategy for the next iteration. Uniform for unseen information sets.
    pub fn current_strategy(&self, key: &InfoSetKey) -> ActionVector {
        regret_matching(&self.regret_sum.get_or_zero(key))
    }

    pub fn average_strategy(&self) -> StrategyProfile {
        StrategyProfile::from_strategy_sums(&self.strategy_sum)
    }

    /// Walks every action below `history` and returns the value of the node for the player
    /// acting at it.
    ///
    /// `reach` holds each player's own contribution to the probability of reaching this node.
    /// `history` is restored before returning.
    pub fn cfr(&mut self, deal: &Deal, history: &mut Vec<Action>, reach: [f64; 2]) -> f64 {
        let player = player_to_act(history);
        if self.game.is_terminal(history) {
            return value_for_player(player, self.game.payoff(deal, history));
        }
        let opponent = player ^ 1;

        let key = self.game.info_set_key(deal[player], history);
        let strategy = self.current_strategy(&key);
        let actions = self.game.legal_actions(history);
        assert_gt!(actions.len(), 0);
        debug!("cfr {}: reach {:?}, strategy {:?}", key, reach, strategy);

        let mut action_values = [0.0; Action::COUNT];
        let mut node_value = 0.0;
        for act in actions {
            let i = act.index();
            let mut next_reach = reach;
            next_reach[player] *= strategy[i];

            history.push(*act);
            action_values[i] = counterfactual_value(self.cfr(deal, history, next_reach));
            history.pop();

            node_value += strategy[i] * action_values[i];
        }

        let regrets = action_values.map(|v| v - node_value);
        self.regret_sum.accumulate(key.clone(), reach[opponent], &regrets);
        self.strategy_sum.accumulate(key, reach[player], &strategy);

        node_value
    }
}

#[cfg(test)]
mod tests {
    use more_asserts::assert_lt;

    use super::*;
    use crate::game::{
        Card,
        KuhnPoker,
    };

    fn key(card: u8, history: &[Action]) -> InfoSetKey {
        InfoSetKey::new(Card(card), history)
    }

    #[test]
    fn test_value_orientation_is_zero_sum() {
        let game = KuhnPoker::default();
        let terminals = [
            vec![Action::Pass, Action::Pass],
            vec![Action::Bet, Action::Pass],
            vec![Action::Bet, Action::Bet],
            vec![Action::Pass, Action::Bet, Action::Pass],
            vec![Action::Pass, Action::Bet, Action::Bet],
        ];
        for c0 in game.deck() {
            for c1 in game.deck().into_iter().filter(|c| *c != c0) {
                for history in &terminals {
                    let payoff = game.payoff(&[c0, c1], history);
                    assert_ne!(0.0, payoff);
                    assert_eq!(payoff, value_for_player(0, payoff));
                    assert_eq!(-value_for_player(0, payoff), value_for_player(1, payoff));
                }
            }
        }
    }

    #[test]
    fn test_counterfactual_value_flips_sign() {
        assert_eq!(-1.5, counterfactual_value(1.5));
        assert_eq!(2.0, counterfactual_value(-2.0));
    }

    #[test]
    fn test_first_pass_uniform_value() {
        let mut solver = Solver::new(KuhnPoker::default());
        let mut history = vec![];
        let value = solver.cfr(&[Card(3), Card(1)], &mut history, [1.0, 1.0]);
        assert!(history.is_empty());
        assert_lt!((value - 1.125).abs(), 1e-12);

        // Both players see uniform strategies on the first pass.
        assert_eq!(Some(&[-0.375, 0.375]), solver.regret_table().get(&key(3, &[])));
        assert_eq!(Some(&[0.5, 0.5]), solver.strategy_sum_table().get(&key(3, &[])));

        // Player 1 holding the low card facing a bet; opponent reach is 0.5.
        assert_eq!(Some(&[0.25, -0.25]), solver.regret_table().get(&key(1, &[Action::Bet])));
        assert_eq!(
            Some(&[0.5, 0.5]),
            solver.strategy_sum_table().get(&key(1, &[Action::Bet]))
        );

        // Player 0's second decision is weighted by its own reach of 0.5.
        assert_eq!(
            Some(&[0.25, 0.25]),
            solver.strategy_sum_table().get(&key(3, &[Action::Pass, Action::Bet]))
        );
        // 4 decision nodes for one deal.
        assert_eq!(4, solver.regret_table().len());
    }

    #[test]
    fn test_current_strategy_follows_regret() {
        let mut solver = Solver::new(KuhnPoker::default());
        let root = key(3, &[]);
        assert_eq!([0.5, 0.5], solver.current_strategy(&root));

        solver.cfr(&[Card(3), Card(1)], &mut vec![], [1.0, 1.0]);
        assert_eq!([0.0, 1.0], solver.current_strategy(&root));
    }

    #[test]
    fn test_reset() {
        let mut solver = Solver::new(KuhnPoker::default());
        solver.cfr(&[Card(2), Card(1)], &mut vec![], [1.0, 1.0]);
        assert!(!solver.regret_table().is_empty());
        assert!(!solver.average_strategy().is_empty());

        solver.reset();
        assert!(solver.regret_table().is_empty());
        assert!(solver.strategy_sum_table().is_empty());
        assert!(solver.average_strategy().is_empty());
    }
}
