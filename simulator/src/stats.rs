use std::time::Duration;

/// The outcome of one simulated game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameRecord {
    pub turns: u32,
    pub elapsed: Duration,
    pub finished: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub games: usize,
    pub unfinished: usize,
    pub mean_turns: f64,
    pub median_turns: f64,
    pub mean_time: Duration,
    pub median_time: Duration,
    pub mean_time_per_turn: Duration,
}

/// Summarizes the given games. Returns `None` when there are none.
pub fn summarize(records: &[GameRecord]) -> Option<Summary> {
    if records.is_empty() {
        return None;
    }
    let games = records.len();
    let turns: Vec<f64> = records.iter().map(|r| f64::from(r.turns)).collect();
    let times: Vec<f64> = records.iter().map(|r| r.elapsed.as_secs_f64()).collect();
    let total_turns: f64 = turns.iter().sum();
    let total_time: f64 = times.iter().sum();
    let per_turn = if total_turns > 0.0 {
        total_time / total_turns
    } else {
        0.0
    };
    Some(Summary {
        games,
        unfinished: records.iter().filter(|r| !r.finished).count(),
        mean_turns: total_turns / games as f64,
        median_turns: median(turns),
        mean_time: Duration::from_secs_f64(total_time / games as f64),
        median_time: Duration::from_secs_f64(median(times)),
        mean_time_per_turn: Duration::from_secs_f64(per_turn),
    })
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
