//! Game record builders shared by the integration tests

use chrono::{DateTime, Duration, TimeZone, Utc};
use skill_ledger::config::RatingConfig;
use skill_ledger::types::{GameRecord, TeamRoster};
use skill_ledger::RatingEngine;

pub const LAN_ROSTER: [&str; 8] = ["ana", "ben", "cho", "dia", "eli", "fay", "gus", "hal"];

/// Minutes after the start of the evening
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 19, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn team(team_id: u32, members: &[&str]) -> TeamRoster {
    TeamRoster::new(team_id, members.iter().copied())
}

/// Two-team game won by the first team
pub fn win(first: &[&str], second: &[&str], minutes: i64) -> GameRecord {
    GameRecord::decisive(vec![team(1, first), team(2, second)], 1, at(minutes))
}

pub fn draw(first: &[&str], second: &[&str], minutes: i64) -> GameRecord {
    GameRecord::draw(vec![team(1, first), team(2, second)], at(minutes))
}

/// Two-team game whose result the parser could not recover
pub fn undecided(first: &[&str], second: &[&str], minutes: i64) -> GameRecord {
    let mut game = win(first, second, minutes);
    game.winning_team_id = None;
    game
}

/// Free-for-all with one team per competitor; the first one wins
pub fn free_for_all(members: &[&str], minutes: i64) -> GameRecord {
    let teams = members
        .iter()
        .zip(1..)
        .map(|(&member, team_id)| team(team_id, &[member]))
        .collect();
    GameRecord::decisive(teams, 1, at(minutes))
}

/// Parameters of the worked first-game example
pub fn scenario_config() -> RatingConfig {
    RatingConfig {
        initial_mean: 25.0,
        initial_stddev: 8.3333,
        beta: 2.7778,
        tau: 0.0833,
        draw_probability: 0.10,
        ..RatingConfig::default()
    }
}

/// One evening of games; ana and ben finish on top, hal at the bottom
///
/// Contains seven ratable games and three that the gate turns away.
pub fn lan_night() -> Vec<GameRecord> {
    vec![
        win(&["ana", "cho", "eli", "gus"], &["ben", "dia", "fay", "hal"], 0),
        win(&["ben", "cho", "fay", "gus"], &["ana", "dia", "eli", "hal"], 25),
        win(&["ana", "ben", "cho", "dia"], &["eli", "fay", "gus", "hal"], 50),
        free_for_all(&["ana", "ben", "cho"], 70),
        draw(&["ana", "fay", "gus", "hal"], &["ben", "cho", "dia", "eli"], 90),
        undecided(&["ana", "ben"], &["gus", "hal"], 110),
        win(&["ana", "ben", "gus"], &["cho", "dia", "eli", "fay", "hal"], 130),
        GameRecord::decisive(vec![team(1, &["ana"]), team(2, &[])], 1, at(150)),
        win(&["ben", "eli", "hal"], &["cho", "fay", "gus"], 170),
        win(&["ana", "dia", "fay"], &["ben", "cho", "hal"], 190),
    ]
}

/// Engine with the default model after processing `games` in order
pub fn engine_after(games: &[GameRecord]) -> RatingEngine {
    let mut engine = RatingEngine::new(RatingConfig::default()).unwrap();
    for game in games {
        engine.process_game(game).unwrap();
    }
    engine
}
