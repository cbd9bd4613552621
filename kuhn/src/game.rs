use std::{
    fmt::Display,
    str::FromStr,
};

use itertools::Itertools;
use rand::{
    seq::SliceRandom,
    Rng,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::KuhnError;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Pass,
    Bet,
}

impl Action {
    pub const VALUES: [Action; 2] = [Action::Pass, Action::Bet];
    pub const COUNT: usize = Action::VALUES.len();

    /// Position of this action in every per-info-set vector.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn token(&self) -> &'static str {
        match self {
            Action::Pass => "PASS",
            Action::Bet => "BET",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.token())
    }
}

impl FromStr for Action {
    type Err = KuhnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("PASS") || token == "0" {
            Ok(Action::Pass)
        } else if token.eq_ignore_ascii_case("BET") || token == "1" {
            Ok(Action::Bet)
        } else {
            Err(KuhnError::InvalidAction(s.to_string()))
        }
    }
}

impl TryFrom<i64> for Action {
    type Error = KuhnError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::Pass),
            1 => Ok(Action::Bet),
            _ => Err(KuhnError::InvalidAction(value.to_string())),
        }
    }
}

/// A card rank. Higher ranks win at showdown.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card(pub u8);

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Private cards of player 0 and player 1.
pub type Deal = [Card; 2];

/// Shuffles `deck` in place and hands its first two cards to player 0 and player 1.
pub fn deal<R: Rng + ?Sized>(deck: &mut [Card], rng: &mut R) -> Deal {
    debug_assert!(deck.len() >= 2);
    deck.shuffle(rng);
    [deck[0], deck[1]]
}

/// Players alternate, player 0 acts on even-length histories.
pub fn player_to_act(history: &[Action]) -> usize {
    history.len() % 2
}

/// Canonical `"<card>:<ACTION>:<ACTION>..."` form of an information set.
///
/// The key is rendered from the acting player's card and the whole public history, so two keys
/// are equal only if both the card and the history are.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InfoSetKey(String);

impl InfoSetKey {
    pub fn new(card: Card, history: &[Action]) -> Self {
        InfoSetKey(format!("{}:{}", card, history.iter().join(":")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recovers the card and history the key was rendered from.
    pub fn parse(&self) -> Result<(Card, Vec<Action>), KuhnError> {
        let invalid = || KuhnError::InvalidInfoSetKey(self.0.clone());
        let (card, rest) = self.0.split_once(':').ok_or_else(invalid)?;
        let card = card.parse::<u8>().map_err(|_| invalid())?;
        let history = if rest.is_empty() {
            vec![]
        } else {
            rest.split(':')
                .map(|token| token.parse::<Action>().map_err(|_| invalid()))
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok((Card(card), history))
    }
}

impl FromStr for InfoSetKey {
    type Err = KuhnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (card, history) = InfoSetKey(s.to_string()).parse()?;
        Ok(InfoSetKey::new(card, &history))
    }
}

impl Display for InfoSetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rules consumed by the solver. Implementations are stateless.
pub trait Game {
    fn deck(&self) -> Vec<Card>;

    fn is_terminal(&self, history: &[Action]) -> bool;

    /// Payoff for player 0. Non-terminal histories are worth 0.
    fn payoff(&self, deal: &Deal, history: &[Action]) -> f64;

    fn legal_actions(&self, history: &[Action]) -> &'static [Action];

    fn info_set_key(&self, card: Card, history: &[Action]) -> InfoSetKey;
}

#[derive(Debug, Clone)]
pub struct KuhnPoker {
    cards: usize,
}

impl KuhnPoker {
    pub const MAX_CARDS: usize = 99;

    pub fn new(cards: usize) -> Result<Self, KuhnError> {
        if !(2..=Self::MAX_CARDS).contains(&cards) {
            return Err(KuhnError::InvalidDeck {
                got: cards,
                max: Self::MAX_CARDS,
            });
        }
        Ok(Self {
            cards,
        })
    }

    pub fn num_cards(&self) -> usize {
        self.cards
    }
}

impl Default for KuhnPoker {
    fn default() -> Self {
        Self {
            cards: 3,
        }
    }
}

impl Game for KuhnPoker {
    fn deck(&self) -> Vec<Card> {
        (1..=self.cards as u8).map(Card).collect()
    }

    fn is_terminal(&self, history: &[Action]) -> bool {
        matches!(
            history,
            [.., Action::Pass, Action::Pass]
                | [.., Action::Bet, Action::Pass]
                | [.., Action::Bet, Action::Bet]
        )
    }

    fn payoff(&self, deal: &Deal, history: &[Action]) -> f64 {
        if !self.is_terminal(history) {
            return 0.0;
        }

        let showdown = if deal[0] > deal[1] {
            1.0
        } else {
            -1.0
        };
        match history {
            // The last actor folded: player 1 on even lengths, player 0 on odd ones.
            [.., Action::Bet, Action::Pass] => {
                if history.len() % 2 == 0 {
                    1.0
                } else {
                    -1.0
                }
            }
            [.., Action::Bet, Action::Bet] => 2.0 * showdown,
            [.., Action::Pass, Action::Pass] => showdown,
            _ => 0.0,
        }
    }

    fn legal_actions(&self, history: &[Action]) -> &'static [Action] {
        if self.is_terminal(history) {
            return &[];
        }
        &Action::VALUES
    }

    fn info_set_key(&self, card: Card, history: &[Action]) -> InfoSetKey {
        InfoSetKey::new(card, history)
    }
}
