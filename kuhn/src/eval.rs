use log::debug;
use more_asserts::debug_assert_ge;
use rand::Rng;
use rand_distr::{
    Distribution,
    WeightedIndex,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    game::{
        deal,
        player_to_act,
        Action,
        Card,
        Deal,
        Game,
        InfoSetKey,
    },
    regret::ActionVector,
    solver::value_for_player,
    strategy::StrategyProfile,
};

/// Something that picks an action at an information set.
pub trait Policy {
    fn choose<R: Rng + ?Sized>(&self, info_set: &InfoSetKey, rng: &mut R) -> Action;
}

/// Baseline opponent: bets (or calls) every time, whatever it holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysBet;

impl Policy for AlwaysBet {
    fn choose<R: Rng + ?Sized>(&self, _info_set: &InfoSetKey, _rng: &mut R) -> Action {
        Action::Bet
    }
}

impl Policy for StrategyProfile {
    fn choose<R: Rng + ?Sized>(&self, info_set: &InfoSetKey, rng: &mut R) -> Action {
        sample_action(&self.get_or_uniform(info_set), rng)
    }
}

pub fn sample_action<R: Rng + ?Sized>(strategy: &ActionVector, rng: &mut R) -> Action {
    match WeightedIndex::new(strategy) {
        Ok(dist) => Action::VALUES[dist.sample(rng)],
        Err(e) => {
            debug!("Invalid weights: e: {} probs: {:?}", e, strategy);
            Action::VALUES[rng.gen_range(0..Action::COUNT)]
        }
    }
}

/// Plays one hand to the end. Returns the history and player 0's payoff.
pub fn play_hand<G, A, B, R>(
    game: &G,
    cards: &Deal,
    seat0: &A,
    seat1: &B,
    rng: &mut R,
) -> (Vec<Action>, f64)
where
    G: Game,
    A: Policy,
    B: Policy,
    R: Rng + ?Sized,
{
    let mut history = vec![];
    while !game.is_terminal(&history) {
        let player = player_to_act(&history);
        let info_set = game.info_set_key(cards[player], &history);
        let action = if player == 0 {
            seat0.choose(&info_set, rng)
        } else {
            seat1.choose(&info_set, rng)
        };
        history.push(action);
    }
    let payoff = game.payoff(cards, &history);
    (history, payoff)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub avg_payoff: f64,
    pub total_games: u64,
}

/// Average payoff of `hero` sitting in seat 0 against `villain` over `games` random deals.
pub fn evaluate<G, A, B, R>(game: &G, hero: &A, villain: &B, games: u64, rng: &mut R) -> Evaluation
where
    G: Game,
    A: Policy,
    B: Policy,
    R: Rng + ?Sized,
{
    let mut deck = game.deck();
    let mut total = 0.0;
    for _ in 0..games {
        let cards = deal(&mut deck, rng);
        total += play_hand(game, &cards, hero, villain, rng).1;
    }
    let avg_payoff = if games == 0 {
        0.0
    } else {
        total / games as f64
    };
    Evaluation {
        avg_payoff,
        total_games: games,
    }
}

fn best_response_walk<G: Game>(
    game: &G,
    profile: &StrategyProfile,
    br_player: usize,
    br_card: Card,
    history: &mut Vec<Action>,
    opponents: &[(Card, f64)],
) -> f64 {
    if game.is_terminal(history) {
        let mut value = 0.0;
        for (card, reach) in opponents {
            let cards = if br_player == 0 {
                [br_card, *card]
            } else {
                [*card, br_card]
            };
            value += reach * value_for_player(br_player, game.payoff(&cards, history));
        }
        return value;
    }

    let actions = game.legal_actions(history);
    if player_to_act(history) == br_player {
        // The info set is the same for every opponent card, so one action is picked for all.
        let mut best = f64::NEG_INFINITY;
        for act in actions {
            history.push(*act);
            let value = best_response_walk(game, profile, br_player, br_card, history, opponents);
            history.pop();
            best = best.max(value);
        }
        return best;
    }

    let mut value = 0.0;
    for act in actions {
        let next: Vec<(Card, f64)> = opponents
            .iter()
            .map(|(card, reach)| {
                let s = profile.get_or_uniform(&game.info_set_key(*card, history));
                (*card, reach * s[act.index()])
            })
            .collect();
        history.push(*act);
        value += best_response_walk(game, profile, br_player, br_card, history, &next);
        history.pop();
    }
    value
}

/// Expected payoff of `br_player` playing a best response to `profile`, over all deals.
pub fn best_response_value<G: Game>(game: &G, profile: &StrategyProfile, br_player: usize) -> f64 {
    let deck = game.deck();
    let deals = (deck.len() * (deck.len() - 1)) as f64;
    let mut total = 0.0;
    for br_card in &deck {
        let opponents: Vec<(Card, f64)> =
            deck.iter().filter(|c| *c != br_card).map(|c| (*c, 1.0)).collect();
        total +=
            best_response_walk(game, profile, br_player, *br_card, &mut vec![], &opponents);
    }
    total / deals
}

/// Mean gain of the two best responses against `profile`. Zero exactly at a Nash equilibrium.
pub fn exploitability<G: Game>(game: &G, profile: &StrategyProfile) -> f64 {
    let br0 = best_response_value(game, profile, 0);
    let br1 = best_response_value(game, profile, 1);
    debug!("util_0(br0): {}, util_1(br1): {}", br0, br1);
    let exploitability = (br0 + br1) / 2.0;
    debug_assert_ge!(exploitability, -1e-9, "Exploitability must be positive value.");
    exploitability
}
