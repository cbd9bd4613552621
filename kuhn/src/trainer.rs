use std::time::{
    Duration,
    Instant,
};

use clap::Args;
use log::info;
use rand::SeedableRng;
use wyhash::WyRng;

use crate::{
    error::KuhnError,
    eval::exploitability,
    game::{
        deal,
        Card,
        Game,
        InfoSetKey,
        KuhnPoker,
    },
    history::{
        tracked_info_sets,
        TrainingHistory,
    },
    solver::Solver,
    strategy::StrategyProfile,
};

#[derive(Args, Debug, Clone)]
pub struct TrainingArgs {
    /// Number of CFR iterations, one random deal each.
    #[clap(long, short, value_parser, default_value_t = 10000)]
    pub iterations: u64,

    /// Record a history snapshot every this many iterations.
    #[clap(long, short, value_parser, default_value_t = 100)]
    pub track_interval: u64,

    /// Seed of the deal generator.
    #[clap(long, short, value_parser, default_value_t = 42)]
    pub seed: u64,

    /// Number of distinct card ranks in the deck.
    #[clap(long, short, value_parser, default_value_t = 3)]
    pub cards: usize,
}

impl TrainingArgs {
    pub fn new(iterations: u64) -> Self {
        TrainingArgs {
            iterations,
            track_interval: 100,
            seed: 42,
            cards: 3,
        }
    }
}

pub struct Trainer<G>
where
    G: Game,
{
    solver: Solver<G>,
    rng: WyRng,
    deck: Vec<Card>,
    tracked: Vec<InfoSetKey>,
    history: TrainingHistory,
    average_game_value: f64,
}

impl Trainer<KuhnPoker> {
    pub fn from_args(args: &TrainingArgs) -> Result<Self, KuhnError> {
        Ok(Self::new(KuhnPoker::new(args.cards)?, args.seed))
    }
}

impl<G> Trainer<G>
where
    G: Game,
{
    pub fn new(game: G, seed: u64) -> Self {
        let deck = game.deck();
        let tracked = tracked_info_sets(&game);
        Trainer {
            solver: Solver::new(game),
            rng: WyRng::seed_from_u64(seed),
            deck,
            tracked,
            history: TrainingHistory::default(),
            average_game_value: 0.0,
        }
    }

    pub fn solver(&self) -> &Solver<G> {
        &self.solver
    }

    pub fn average_strategy(&self) -> StrategyProfile {
        self.solver.average_strategy()
    }

    pub fn training_history(&self) -> &TrainingHistory {
        &self.history
    }

    /// Running average of player 0's root value over the last run.
    pub fn average_game_value(&self) -> f64 {
        self.average_game_value
    }

    /// Runs a fresh training session and returns the resulting average strategy.
    ///
    /// Tables and history are reset first. The deal generator is not: consecutive runs on one
    /// trainer continue the same random stream. A `track_interval` of 0 records only the final
    /// iteration.
    ///
    /// Snapshot `n` is taken once iteration `n` has updated the tables, so its strategies and
    /// regrets are the ones iteration `n + 1` would start from.
    pub fn train(&mut self, iterations: u64, track_interval: u64) -> StrategyProfile {
        self.solver.reset();
        self.history.clear();
        self.average_game_value = 0.0;
        info!("Starting CFR training for {} iterations", iterations);

        let mut util = 0.0;
        let mut history = Vec::with_capacity(3);
        let start_t = Instant::now();
        let mut timer = Instant::now();
        for i in 0..iterations {
            let cards = deal(&mut self.deck, &mut self.rng);
            util += self.solver.cfr(&cards, &mut history, [1.0, 1.0]);

            let done = i + 1;
            self.average_game_value = util / done as f64;
            if (track_interval > 0 && done % track_interval == 0) || done == iterations {
                self.snapshot(done);
            }
            if timer.elapsed() > Duration::from_secs(5) {
                let exploitability =
                    exploitability(self.solver.game(), &self.solver.average_strategy());
                info!("epoch {:10}: exploitability: {}", done, exploitability);
                info!("Average game value: {}", self.average_game_value);
                timer = Instant::now();
            }
        }
        info!("Training has finished in {:.2?}", start_t.elapsed());

        let strategy = self.average_strategy();
        info!("Nodes [");
        for (key, s) in strategy.iter() {
            info!("    {:12} PASS: {:.4}, BET: {:.4}", key.as_str(), s[0], s[1]);
        }
        info!("]");
        info!("# of infoset: {}", strategy.len());
        info!("Average game value: {}", self.average_game_value);
        info!("exploitability: {}", exploitability(self.solver.game(), &strategy));

        strategy
    }

    fn snapshot(&mut self, iteration: u64) {
        let solver = &self.solver;
        self.history.record(
            iteration,
            self.average_game_value,
            self.tracked.iter().map(|key| {
                (
                    key.clone(),
                    solver.current_strategy(key),
                    solver.regret_table().get_or_zero(key),
                )
            }),
        );
    }
}
