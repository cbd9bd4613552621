//! Counterfactual regret minimization for Kuhn poker.
//!
//! [`trainer::Trainer`] deals random private cards, walks the full action tree for each deal with
//! [`solver::Solver::cfr`], and reports the time-averaged strategy, which approaches a Nash
//! equilibrium as the number of iterations grows.

pub mod error;
pub mod eval;
pub mod game;
pub mod history;
pub mod play;
pub mod regret;
pub mod solver;
pub mod strategy;
pub mod trainer;

pub use error::KuhnError;
pub use game::{
    Action,
    Card,
    Game,
    InfoSetKey,
    KuhnPoker,
};
pub use strategy::StrategyProfile;
pub use trainer::{
    Trainer,
    TrainingArgs,
};
