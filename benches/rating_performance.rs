//! Performance benchmarks for rating updates and balance searches

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skill_ledger::config::{BalanceConfig, RatingConfig};
use skill_ledger::rating::{rate_two_teams, MatchQualityEstimator, TwoTeamOutcome};
use skill_ledger::types::{Belief, GameRecord, TeamRoster};
use skill_ledger::{RatingEngine, TeamBalanceSearch};

fn roster(size: usize) -> Vec<String> {
    (0..size).map(|i| format!("player{i}")).collect()
}

/// Engine that has seen a few rounds of games between `players`
fn warmed_engine(players: &[String]) -> RatingEngine {
    let mut engine = RatingEngine::new(RatingConfig::default()).unwrap();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap();
    let half = players.len() / 2;

    for round in 0..players.len() {
        let mut order = players.to_vec();
        order.rotate_left(round);
        let game = GameRecord::decisive(
            vec![
                TeamRoster::new(1, order[..half].to_vec()),
                TeamRoster::new(2, order[half..].to_vec()),
            ],
            if round % 3 == 0 { 2 } else { 1 },
            start + Duration::minutes(round as i64 * 20),
        );
        engine.process_game(&game).unwrap();
    }
    engine
}

fn bench_rating_updates(c: &mut Criterion) {
    let config = RatingConfig::default();
    let first: Vec<Belief> = (0..4).map(|i| Belief::new(22.0 + i as f64, 5.0)).collect();
    let second: Vec<Belief> = (0..4).map(|i| Belief::new(24.0 + i as f64, 6.0)).collect();
    let uneven: Vec<Belief> = (0..5).map(|i| Belief::new(23.0 + i as f64, 5.5)).collect();

    c.bench_function("rate_two_teams_4v4", |b| {
        b.iter(|| {
            black_box(rate_two_teams(
                &config,
                black_box(&first),
                black_box(&second),
                TwoTeamOutcome::FirstWins,
            ))
        })
    });

    c.bench_function("rate_two_teams_4v5_draw", |b| {
        b.iter(|| {
            black_box(rate_two_teams(
                &config,
                black_box(&first),
                black_box(&uneven),
                TwoTeamOutcome::Draw,
            ))
        })
    });

    let estimator = MatchQualityEstimator::new(&config);
    c.bench_function("match_quality_4v4", |b| {
        b.iter(|| black_box(estimator.quality(black_box(&first), black_box(&second))))
    });
}

fn bench_process_games(c: &mut Criterion) {
    let players = roster(10);
    c.bench_function("process_10_rounds_5v5", |b| {
        b.iter(|| black_box(warmed_engine(black_box(&players))))
    });
}

fn bench_balance_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("balance_search");

    for size in [8usize, 10, 12] {
        let players = roster(size);
        let engine = warmed_engine(&players);

        for parallel in [false, true] {
            let search = TeamBalanceSearch::new(BalanceConfig {
                parallel,
                ..BalanceConfig::default()
            })
            .unwrap();
            let label = if parallel { "parallel" } else { "sequential" };

            group.bench_with_input(BenchmarkId::new(label, size), &players, |b, players| {
                b.iter(|| {
                    black_box(
                        search
                            .find_top_balanced(&engine, black_box(players), 3)
                            .unwrap(),
                    )
                })
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_rating_updates,
    bench_process_games,
    bench_balance_search
);
criterion_main!(benches);
