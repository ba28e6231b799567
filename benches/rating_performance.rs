//! Performance benchmarks for rating calculations and the season fold

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use puckrank::config::StandingsSettings;
use puckrank::rating::{Glicko2Calculator, RatingCalculator};
use puckrank::standings::{LeagueInfo, StandingsComposer, StandingsOrder};
use puckrank::types::{Match, OutcomeKind, RatingState};
use puckrank::Season;

/// Every league pairing `rounds` times, alternating home ice
fn bench_schedule(league: &LeagueInfo, rounds: usize) -> Vec<Match> {
    let teams: Vec<&str> = league.teams().iter().map(|t| t.abbrev.as_str()).collect();
    let start = NaiveDate::from_ymd_opt(2023, 10, 1).unwrap();

    let mut matches = Vec::new();
    for round in 0..rounds {
        for i in 0..teams.len() {
            for j in (i + 1)..teams.len() {
                let (away, home) = if round % 2 == 0 { (i, j) } else { (j, i) };
                let n = matches.len();
                let outcome = if n % 5 == 0 {
                    OutcomeKind::Overtime
                } else {
                    OutcomeKind::Regulation
                };
                let (away_score, home_score) = if (i * j + round) % 3 == 0 { (2, 3) } else { (4, 1) };
                matches.push(
                    Match::new(
                        start + Duration::days((n / 16) as i64),
                        "7:00 PM",
                        teams[away],
                        teams[home],
                        away_score,
                        home_score,
                        outcome,
                    )
                    .unwrap(),
                );
            }
        }
    }
    matches
}

fn bench_rating_calculations(c: &mut Criterion) {
    let calculator = Glicko2Calculator::default();

    let pairs = vec![
        ("even", RatingState::default(), RatingState::default()),
        (
            "favourite",
            RatingState {
                mu: 1720.0,
                phi: 80.0,
                sigma: 0.06,
            },
            RatingState {
                mu: 1410.0,
                phi: 95.0,
                sigma: 0.06,
            },
        ),
        (
            "settled",
            RatingState {
                mu: 1540.0,
                phi: 45.0,
                sigma: 0.059,
            },
            RatingState {
                mu: 1525.0,
                phi: 50.0,
                sigma: 0.061,
            },
        ),
    ];

    let mut group = c.benchmark_group("glicko2_update");
    for (name, player, opponent) in &pairs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &(player, opponent), |b, (p, o)| {
            b.iter(|| calculator.update(black_box(p), black_box(o), black_box(1.0)).unwrap())
        });
    }
    group.finish();

    c.bench_function("expected_score", |b| {
        let (_, player, opponent) = &pairs[1];
        b.iter(|| calculator.expected_score(black_box(player), black_box(opponent)))
    });
}

fn bench_season_fold(c: &mut Criterion) {
    let calculator = Glicko2Calculator::default();
    let league = LeagueInfo::nhl();

    let mut group = c.benchmark_group("season_fold");
    for rounds in [1usize, 2] {
        let matches = bench_schedule(&league, rounds);
        group.bench_with_input(BenchmarkId::from_parameter(matches.len()), &matches, |b, matches| {
            b.iter(|| Season::build(black_box(matches.clone()), &calculator).unwrap())
        });
    }
    group.finish();

    let season = Season::build(bench_schedule(&league, 2), &calculator).unwrap();
    let composer = StandingsComposer::new(&league, StandingsSettings::default());
    c.bench_function("standings_rows", |b| {
        b.iter(|| composer.rows(black_box(&season), StandingsOrder::Default))
    });
}

criterion_group!(benches, bench_rating_calculations, bench_season_fold);
criterion_main!(benches);
