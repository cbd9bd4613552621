use kuhn::{
    eval::{
        evaluate,
        exploitability,
        AlwaysBet,
    },
    InfoSetKey,
    KuhnPoker,
    StrategyProfile,
    Trainer,
};
use more_asserts::{
    assert_ge,
    assert_gt,
    assert_lt,
};
use rand::SeedableRng;
use wyhash::WyRng;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn bet_probability(profile: &StrategyProfile, key: &str) -> f64 {
    let key: InfoSetKey = key.parse().unwrap();
    profile.get(&key).unwrap_or_else(|| panic!("{} was never visited", key))[1]
}

fn assert_normalized(profile: &StrategyProfile) {
    for (key, s) in profile.iter() {
        assert_ge!(s[0], 0.0, "{}", key);
        assert_ge!(s[1], 0.0, "{}", key);
        assert_lt!((s[0] + s[1] - 1.0).abs(), 1e-6, "{}", key);
    }
}

#[test]
fn test_three_card_convergence() {
    init_logger();
    let game = KuhnPoker::default();
    let mut trainer = Trainer::new(game.clone(), 42);
    let profile = trainer.train(50_000, 1000);

    // 3 cards x (2 decisions for player 0 + 2 for player 1)
    assert_eq!(12, profile.len());
    assert_normalized(&profile);

    let bluff = bet_probability(&profile, "1:");
    assert_gt!(bluff, 0.0);
    assert_lt!(bluff, 1.0 / 3.0);

    // The highest card always calls a bet, in either seat.
    assert_gt!(bet_probability(&profile, "3:BET"), 0.99);
    assert_gt!(bet_probability(&profile, "3:PASS:BET"), 0.99);
    // The lowest card never calls one.
    assert_lt!(bet_probability(&profile, "1:BET"), 0.01);
    assert_lt!(bet_probability(&profile, "1:PASS:BET"), 0.01);

    assert_lt!(exploitability(&game, &profile), 0.02);
    assert_lt!((trainer.average_game_value() + 1.0 / 18.0).abs(), 0.03);
}

#[test]
fn test_trained_strategy_beats_baseline() {
    init_logger();
    let game = KuhnPoker::default();
    let mut trainer = Trainer::new(game.clone(), 1);
    let profile = trainer.train(20_000, 0);

    let mut rng = WyRng::seed_from_u64(99);
    let result = evaluate(&game, &profile, &AlwaysBet, 20_000, &mut rng);
    assert_eq!(20_000, result.total_games);
    // Every equilibrium earns 1/9 per hand against a player who always bets.
    assert_gt!(result.avg_payoff, 0.05);
}

#[test]
fn test_larger_deck() {
    init_logger();
    let game = KuhnPoker::new(5).unwrap();
    let mut trainer = Trainer::new(game.clone(), 42);
    let profile = trainer.train(20_000, 500);

    assert_eq!(20, profile.len());
    assert_normalized(&profile);
    assert_eq!(15, trainer.training_history().strategies.len());
    assert_gt!(bet_probability(&profile, "5:BET"), 0.99);
    assert_lt!(exploitability(&game, &profile), 0.1);
}
