use kuhn::{
    history::TrainingHistory,
    KuhnPoker,
    Trainer,
};

fn run(seed: u64, iterations: u64) -> Trainer<KuhnPoker> {
    let mut trainer = Trainer::new(KuhnPoker::default(), seed);
    trainer.train(iterations, 250);
    trainer
}

#[test]
fn test_same_seed_same_tables() {
    let a = run(2023, 5_000);
    let b = run(2023, 5_000);

    assert_eq!(a.solver().regret_table(), b.solver().regret_table());
    assert_eq!(a.solver().strategy_sum_table(), b.solver().strategy_sum_table());
    assert_eq!(a.average_strategy(), b.average_strategy());
    assert_eq!(a.training_history(), b.training_history());
    assert_eq!(a.average_game_value().to_bits(), b.average_game_value().to_bits());
}

#[test]
fn test_different_seed_different_tables() {
    let a = run(1, 5_000);
    let b = run(2, 5_000);
    assert_ne!(a.solver().regret_table(), b.solver().regret_table());
}

#[test]
fn test_history_json_shape() {
    let trainer = run(7, 1_000);
    let history = trainer.training_history();
    let json = serde_json::to_value(history).unwrap();

    let object = json.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
    keys.sort();
    assert_eq!(vec!["expected_payoffs", "iterations", "regrets", "strategies"], keys);

    assert_eq!(serde_json::json!([250, 500, 750, 1000]), json["iterations"]);
    assert_eq!(4, json["strategies"]["1:"].as_array().unwrap().len());
    assert_eq!(2, json["regrets"]["3:BET"][0].as_array().unwrap().len());

    let back: TrainingHistory = serde_json::from_value(json).unwrap();
    assert_eq!(history, &back);
}
