use std::fmt::Display;

use itertools::Itertools;
use rand::Rng;

use crate::{
    error::KuhnError,
    eval::Policy,
    game::{
        player_to_act,
        Action,
        Deal,
        Game,
        InfoSetKey,
    },
};

/// Result of a finished hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub winner: usize,
    pub amount: f64,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {} wins {}", self.winner, self.amount)
    }
}

/// A single hand driven by outside callers, one validated action at a time.
pub struct Match<'a, G>
where
    G: Game,
{
    game: &'a G,
    cards: Deal,
    history: Vec<Action>,
}

impl<'a, G> Match<'a, G>
where
    G: Game,
{
    pub fn new(game: &'a G, cards: Deal) -> Self {
        Self {
            game,
            cards,
            history: vec![],
        }
    }

    pub fn cards(&self) -> &Deal {
        &self.cards
    }

    pub fn history(&self) -> &[Action] {
        &self.history
    }

    pub fn is_over(&self) -> bool {
        self.game.is_terminal(&self.history)
    }

    /// Seat to act, or `None` once the hand is over.
    pub fn to_act(&self) -> Option<usize> {
        if self.is_over() {
            return None;
        }
        Some(player_to_act(&self.history))
    }

    /// Information set of the seat to act.
    pub fn info_set(&self) -> Option<InfoSetKey> {
        self.to_act().map(|player| self.game.info_set_key(self.cards[player], &self.history))
    }

    pub fn apply(&mut self, action: Action) -> Result<(), KuhnError> {
        if self.is_over() {
            return Err(KuhnError::GameOver);
        }
        if !self.game.legal_actions(&self.history).contains(&action) {
            return Err(KuhnError::IllegalAction {
                action,
                history: self.history.iter().join(":"),
            });
        }
        self.history.push(action);
        Ok(())
    }

    /// Parses a caller-supplied token (`PASS`, `BET`, `0`, `1`) and applies it.
    pub fn apply_token(&mut self, token: &str) -> Result<Action, KuhnError> {
        let action = token.parse()?;
        self.apply(action)?;
        Ok(action)
    }

    /// Lets `policy` act for the seat to act.
    pub fn apply_policy<P, R>(&mut self, policy: &P, rng: &mut R) -> Result<Action, KuhnError>
    where
        P: Policy,
        R: Rng + ?Sized,
    {
        let info_set = self.info_set().ok_or(KuhnError::GameOver)?;
        let action = policy.choose(&info_set, rng);
        self.apply(action)?;
        Ok(action)
    }

    /// Winner and amount, derived from the sign of player 0's payoff.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_over() {
            return None;
        }
        let payoff = self.game.payoff(&self.cards, &self.history);
        let winner = if payoff > 0.0 {
            0
        } else {
            1
        };
        Some(Outcome {
            winner,
            amount: payoff.abs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use wyhash::WyRng;

    use super::*;
    use crate::{
        eval::AlwaysBet,
        game::{
            Card,
            KuhnPoker,
        },
    };

    /// Kuhn rules, except that betting is never allowed.
    struct NoBetting(KuhnPoker);

    impl Game for NoBetting {
        fn deck(&self) -> Vec<Card> {
            self.0.deck()
        }

        fn is_terminal(&self, history: &[Action]) -> bool {
            self.0.is_terminal(history)
        }

        fn payoff(&self, deal: &Deal, history: &[Action]) -> f64 {
            self.0.payoff(deal, history)
        }

        fn legal_actions(&self, history: &[Action]) -> &'static [Action] {
            if self.is_terminal(history) {
                return &[];
            }
            &[Action::Pass]
        }

        fn info_set_key(&self, card: Card, history: &[Action]) -> InfoSetKey {
            self.0.info_set_key(card, history)
        }
    }

    #[test]
    fn test_fold_outcome() {
        let game = KuhnPoker::default();
        let mut m = Match::new(&game, [Card(1), Card(3)]);
        assert_eq!(Some(0), m.to_act());
        assert_eq!("1:", m.info_set().unwrap().as_str());

        m.apply(Action::Pass).unwrap();
        assert_eq!(Some(1), m.to_act());
        assert_eq!("3:PASS", m.info_set().unwrap().as_str());

        m.apply_token("bet").unwrap();
        m.apply_token("0").unwrap();
        assert!(m.is_over());
        assert_eq!(None, m.to_act());
        // Player 0 folded the lowest card.
        assert_eq!(
            Some(Outcome {
                winner: 1,
                amount: 1.0
            }),
            m.outcome()
        );
    }

    #[test]
    fn test_showdown_outcome() {
        let game = KuhnPoker::default();
        let mut m = Match::new(&game, [Card(3), Card(2)]);
        let mut rng = WyRng::seed_from_u64(1);
        assert_eq!(Action::Bet, m.apply_policy(&AlwaysBet, &mut rng).unwrap());
        assert_eq!(None, m.outcome());
        assert_eq!(Action::Bet, m.apply_policy(&AlwaysBet, &mut rng).unwrap());
        assert_eq!("Player 0 wins 2", m.outcome().unwrap().to_string());
    }

    #[test]
    fn test_rejects_actions_after_the_end() {
        let game = KuhnPoker::default();
        let mut m = Match::new(&game, [Card(2), Card(1)]);
        m.apply(Action::Pass).unwrap();
        m.apply(Action::Pass).unwrap();
        assert!(matches!(m.apply(Action::Bet), Err(KuhnError::GameOver)));
        let mut rng = WyRng::seed_from_u64(1);
        assert!(matches!(m.apply_policy(&AlwaysBet, &mut rng), Err(KuhnError::GameOver)));
        assert_eq!(&[Action::Pass, Action::Pass], m.history());
    }

    #[test]
    fn test_rejects_unknown_tokens() {
        let game = KuhnPoker::default();
        let mut m = Match::new(&game, [Card(2), Card(1)]);
        assert!(matches!(m.apply_token("RAISE"), Err(KuhnError::InvalidAction(_))));
        assert!(matches!(m.apply_token("2"), Err(KuhnError::InvalidAction(_))));
        assert!(m.history().is_empty());
    }

    #[test]
    fn test_rejects_illegal_actions() {
        let game = NoBetting(KuhnPoker::default());
        let mut m = Match::new(&game, [Card(2), Card(1)]);
        let err = m.apply(Action::Bet).unwrap_err();
        assert!(matches!(
            err,
            KuhnError::IllegalAction {
                action: Action::Bet,
                ..
            }
        ));
        assert!(m.history().is_empty());
        m.apply(Action::Pass).unwrap();
        assert!(m.apply(Action::Bet).is_err());
    }
}
