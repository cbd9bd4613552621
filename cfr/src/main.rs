mod report;

use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
    time::Instant,
};

use anyhow::{
    Context,
    Result,
};
use clap::{
    Args,
    Parser,
    Subcommand,
    ValueHint,
};
use dialoguer::{
    Confirm,
    Select,
};
use kuhn::{
    eval::{
        evaluate,
        exploitability,
        AlwaysBet,
    },
    game::deal,
    play::Match,
    Action,
    Game,
    KuhnPoker,
    StrategyProfile,
    Trainer,
    TrainingArgs,
};
use log::info;
use rand::SeedableRng;
use wyhash::WyRng;

use crate::report::TrainingReport;

#[derive(Parser)]
#[clap(about = "Counterfactual regret minimization for Kuhn poker")]
struct AppArgs {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a strategy and write it, its history and its evaluation to disk.
    Train(TrainArgs),
    /// Play a saved strategy against a player who always bets.
    Eval(EvalArgs),
    /// Print a saved strategy.
    Show(ShowArgs),
    /// Play hands against a saved strategy.
    Play(PlayArgs),
}

#[derive(Args)]
struct TrainArgs {
    #[clap(flatten)]
    training: TrainingArgs,

    #[clap(long, short, value_parser, value_hint(ValueHint::DirPath), default_value = "output")]
    output_dir: PathBuf,

    /// Hands played against the baseline after training.
    #[clap(long, short = 'g', value_parser, default_value_t = 1000)]
    eval_games: u64,
}

#[derive(Args)]
struct EvalArgs {
    #[clap(value_parser, value_hint(ValueHint::FilePath))]
    strategy: PathBuf,

    #[clap(long, short, value_parser, default_value_t = 10000)]
    games: u64,

    #[clap(long, short, value_parser, default_value_t = 42)]
    seed: u64,

    #[clap(long, short, value_parser, default_value_t = 3)]
    cards: usize,
}

#[derive(Args)]
struct ShowArgs {
    #[clap(value_parser, value_hint(ValueHint::FilePath))]
    strategy: PathBuf,
}

#[derive(Args)]
struct PlayArgs {
    #[clap(value_parser, value_hint(ValueHint::FilePath))]
    strategy: PathBuf,

    #[clap(long, short, value_parser, default_value_t = 42)]
    seed: u64,

    #[clap(long, short, value_parser, default_value_t = 3)]
    cards: usize,
}

fn main() -> Result<()> {
    // Initialize env_logger with a default log level of INFO.
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let args = AppArgs::parse();
    match args.command {
        Command::Train(args) => train(args),
        Command::Eval(args) => eval(args),
        Command::Show(args) => show(args),
        Command::Play(args) => play(args),
    }
}

fn load_strategy(path: &Path) -> Result<StrategyProfile> {
    StrategyProfile::load(path)
        .with_context(|| format!("Failed to load a strategy: {}", path.display()))
}

fn train(args: TrainArgs) -> Result<()> {
    let mut trainer = Trainer::from_args(&args.training)?;

    let start_t = Instant::now();
    let strategy = trainer.train(args.training.iterations, args.training.track_interval);
    let elapsed = start_t.elapsed();
    info!("CFR training took {}", humantime::format_duration(elapsed));

    let game = trainer.solver().game();
    let mut rng = WyRng::seed_from_u64(args.training.seed);
    let evaluation = evaluate(game, &strategy, &AlwaysBet, args.eval_games, &mut rng);
    info!(
        "Average payoff vs AlwaysBet over {} games: {:.4}",
        evaluation.total_games, evaluation.avg_payoff
    );

    let dir = &args.output_dir;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create a directory: {}", dir.display()))?;

    strategy.save(&dir.join("strategy.json"))?;
    let history = trainer.training_history();
    report::write_json(&dir.join("history.json"), history)?;
    report::write_csv(&dir.join("history.csv"), &history.records())?;
    report::write_json(
        &dir.join("evaluation.json"),
        &TrainingReport {
            cfr_vs_baseline: evaluation,
            training_seconds: elapsed.as_secs_f64(),
            exploitability: exploitability(game, &strategy),
            average_game_value: trainer.average_game_value(),
        },
    )?;
    info!("Results written to {}", dir.display());
    Ok(())
}

fn eval(args: EvalArgs) -> Result<()> {
    let game = KuhnPoker::new(args.cards)?;
    let strategy = load_strategy(&args.strategy)?;

    let mut rng = WyRng::seed_from_u64(args.seed);
    let evaluation = evaluate(&game, &strategy, &AlwaysBet, args.games, &mut rng);
    info!("exploitability: {}", exploitability(&game, &strategy));
    println!("{}", serde_json::to_string_pretty(&evaluation)?);
    Ok(())
}

fn show(args: ShowArgs) -> Result<()> {
    let strategy = load_strategy(&args.strategy)?;
    print!("{}", strategy);
    Ok(())
}

fn play(args: PlayArgs) -> Result<()> {
    let game = KuhnPoker::new(args.cards)?;
    let bot = load_strategy(&args.strategy)?;
    let mut rng = WyRng::seed_from_u64(args.seed);
    let mut deck = game.deck();
    let tokens = Action::VALUES.map(|a| a.token());

    println!("Card values: 1 (lowest) to {} (highest)", game.num_cards());
    let mut net = 0.0;
    loop {
        let cards = deal(&mut deck, &mut rng);
        println!("Your card is: {}", cards[0]);

        let mut hand = Match::new(&game, cards);
        while let Some(player) = hand.to_act() {
            if player == 0 {
                let choice =
                    Select::new().with_prompt("Your action").items(&tokens).default(0).interact()?;
                hand.apply(Action::VALUES[choice])?;
            } else {
                let action = hand.apply_policy(&bot, &mut rng)?;
                println!("Bot action: {}", action);
            }
        }

        println!("Game over! Your card: {}, Bot's card: {}", cards[0], cards[1]);
        if let Some(outcome) = hand.outcome() {
            if outcome.winner == 0 {
                println!("You win {}!", outcome.amount);
                net += outcome.amount;
            } else {
                println!("Bot wins {}!", outcome.amount);
                net -= outcome.amount;
            }
        }

        if !Confirm::new().with_prompt("Play another hand?").default(true).interact()? {
            break;
        }
    }
    info!("Net result: {}", net);
    Ok(())
}
