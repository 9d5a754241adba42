use drawkill::config::AppConfig;
use drawkill::data::SyntheticHistory;
use drawkill::engines::ensemble::DiversitySelector;
use drawkill::types::{EnsembleMode, History, KillCandidate, Pool, TAILS};
use drawkill::KillEngine;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn repeated(rows: usize) -> History {
    History::from_rows(Pool::default(), vec![vec![1, 2, 3, 4, 5, 6, 7]; rows]).unwrap()
}

#[test]
fn test_forward_predictions_on_two_rows() {
    init_logger();
    let history = History::from_rows(
        Pool::default(),
        vec![vec![1, 2, 3, 4, 5, 6, 7], vec![8, 9, 10, 11, 12, 13, 14]],
    )
    .unwrap();
    let forward = KillEngine::default().predict_forward(&history);

    assert_eq!(forward.c, Some(vec![15, 16, 17, 18, 19, 20, 21]));
    assert!(forward.b.is_some());
    assert!(forward.i.is_some());
    assert!(forward.m.is_none());
    assert_eq!(forward.n.map(|n| n.len()), Some(7));
}

#[test]
fn test_forward_predictions_need_two_rows() {
    let forward = KillEngine::default().predict_forward(&repeated(1));
    assert!(forward.b.is_none());
    assert!(forward.c.is_none());
    assert!(forward.i.is_none());
    assert!(forward.m.is_none());
    assert!(forward.n.is_none());
}

#[test]
fn test_repeated_rows_scenario() {
    init_logger();
    let report = KillEngine::default().predict_kill(&repeated(20)).unwrap();
    assert_eq!(report.mode, EnsembleMode::Calibrated);

    let k3 = report
        .per_strategy
        .iter()
        .find(|s| s.id == "K3")
        .and_then(|s| s.candidates.clone())
        .unwrap();
    let mut top: Vec<u8> = k3.iter().take(7).map(|c| c.number).collect();
    top.sort_unstable();
    assert_eq!(top, vec![1, 2, 3, 4, 5, 6, 7]);
    assert!(k3.iter().take(7).all(|c| c.score == 60.0));

    // S1 only ever kills numbers that never appear, so its walk-forward accuracy is perfect
    let backtest = report.backtest.unwrap();
    let s1 = backtest.strategies.iter().find(|s| s.id == "S1").unwrap();
    assert_eq!(s1.samples, 50);
    assert_eq!(s1.accuracy, 1.0);

    // The repeated numbers carry repeat-rate protection and are never killed
    assert!(report.overall.iter().all(|c| c.number > 7));
    assert!(report.protection.iter().any(|p| p.number == 1));
}

#[test]
fn test_backtest_accuracy_bounds() {
    init_logger();
    for seed in 0..4 {
        let history = SyntheticHistory::new(Pool::default(), Some(seed)).generate(45).unwrap();
        let report = KillEngine::default().predict_kill(&history).unwrap();
        let backtest = report.backtest.unwrap();

        assert_eq!(backtest.window, 20);
        for stats in &backtest.strategies {
            assert!((0.0..=1.0).contains(&stats.accuracy), "{}: {}", stats.id, stats.accuracy);
        }
        assert!((0.0..=1.0).contains(&backtest.protection.accuracy));
    }
}

#[test]
fn test_report_is_deterministic_apart_from_timestamp() {
    let history = SyntheticHistory::new(Pool::default(), Some(21)).generate(35).unwrap();
    let engine = KillEngine::default();
    let a = engine.predict_kill(&history).unwrap();
    let b = engine.predict_kill(&history).unwrap();

    assert_eq!(a.overall, b.overall);
    assert_eq!(a.per_strategy, b.per_strategy);
    assert_eq!(a.backtest, b.backtest);
    assert!(serde_json::to_string(&a).is_ok());
}

#[test]
fn test_short_histories() {
    let engine = KillEngine::default();
    assert!(engine.predict_kill(&repeated(4)).is_none());

    let report = engine.predict_kill(&repeated(6)).unwrap();
    assert_eq!(report.mode, EnsembleMode::Simple);
    assert!(report.overall.len() <= 10);
    assert!(report.overall.iter().all(|c| c.votes >= 1));
}

#[test]
fn test_custom_selection_size() {
    let mut config = AppConfig::default();
    config.ensemble.selection_size = 5;
    let history = SyntheticHistory::new(Pool::default(), Some(8)).generate(40).unwrap();
    let report = KillEngine::new(config).predict_kill(&history).unwrap();
    assert!(report.overall.len() <= 5);
}

#[test]
fn test_diversity_invariant_on_shuffled_candidates() {
    let pool = Pool::default();
    let selector = DiversitySelector::new(10, 3, 2);
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..50 {
        let mut numbers: Vec<u8> = pool.numbers().collect();
        numbers.shuffle(&mut rng);
        let candidates: Vec<KillCandidate> = numbers
            .iter()
            .enumerate()
            .map(|(i, &number)| KillCandidate {
                number,
                votes: 1,
                weight: 49.0 - i as f64,
                contributors: vec!["S1".to_string()],
                protection: None,
            })
            .collect();

        let selected = selector.select(&pool, &candidates);
        assert_eq!(selected.len(), 10);

        let mut zones = vec![0; pool.zones];
        let mut tails = [0; TAILS];
        for c in &selected {
            zones[pool.zone_of(c.number)] += 1;
            tails[pool.tail_of(c.number)] += 1;
        }
        assert!(zones.iter().all(|&z| z <= 3));
        assert!(tails.iter().all(|&t| t <= 2));
        assert!(selected.windows(2).all(|w| w[0].weight >= w[1].weight));
    }
}
