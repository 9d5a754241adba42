use crate::error::{DrawkillError, Result};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of tail digits (last decimal digit of a number).
pub const TAILS: usize = 10;

/// The closed integer universe `[1, size]` plus the fixed draw size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPool")]
pub struct Pool {
    pub size: u8,
    pub draw_size: usize,
    pub zones: usize,
}

impl Default for Pool {
    fn default() -> Self {
        Self {
            size: 49,
            draw_size: 7,
            zones: 5,
        }
    }
}

#[derive(Deserialize)]
struct RawPool {
    size: u8,
    draw_size: usize,
    zones: usize,
}

impl TryFrom<RawPool> for Pool {
    type Error = DrawkillError;

    fn try_from(raw: RawPool) -> Result<Self> {
        Pool::new(raw.size, raw.draw_size, raw.zones)
    }
}

impl Pool {
    pub fn new(size: u8, draw_size: usize, zones: usize) -> Result<Self> {
        if size == 0 {
            return Err(DrawkillError::Configuration(
                "Pool size must be at least 1".to_string(),
            ));
        }
        if draw_size == 0 || draw_size > size as usize {
            return Err(DrawkillError::Configuration(format!(
                "Draw size must be between 1 and {}",
                size
            )));
        }
        if zones == 0 || zones > size as usize {
            return Err(DrawkillError::Configuration(format!(
                "Zone count must be between 1 and {}",
                size
            )));
        }
        Ok(Self {
            size,
            draw_size,
            zones,
        })
    }

    pub fn contains(&self, number: u8) -> bool {
        number >= 1 && number <= self.size
    }

    pub fn numbers(&self) -> impl Iterator<Item = u8> {
        1..=self.size
    }

    fn zone_width(&self) -> usize {
        (self.size as usize + self.zones - 1) / self.zones
    }

    /// Zone index in `0..zones`; zones are equal-width bands, the last one may be short.
    pub fn zone_of(&self, number: u8) -> usize {
        ((number.saturating_sub(1)) as usize / self.zone_width()).min(self.zones - 1)
    }

    pub fn zone_size(&self, zone: usize) -> usize {
        self.numbers().filter(|&n| self.zone_of(n) == zone).count()
    }

    pub fn tail_of(&self, number: u8) -> usize {
        (number % 10) as usize
    }

    pub fn tail_size(&self, tail: usize) -> usize {
        self.numbers().filter(|&n| self.tail_of(n) == tail).count()
    }

    /// Expected draw sum for a uniform draw: `K * (P + 1) / 2`.
    pub fn center_sum(&self) -> f64 {
        self.draw_size as f64 * (self.size as f64 + 1.0) / 2.0
    }

    pub fn clamp(&self, value: f64) -> u8 {
        value.round().clamp(1.0, self.size as f64) as u8
    }
}

/// Dense per-number table over `[1, P]`; slot 0 is unused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberMap<T> {
    slots: Vec<T>,
}

impl<T: Clone> NumberMap<T> {
    pub fn new(pool: &Pool, fill: T) -> Self {
        Self {
            slots: vec![fill; pool.size as usize + 1],
        }
    }
}

impl<T> NumberMap<T> {
    pub fn get(&self, number: u8) -> Option<&T> {
        if number == 0 {
            return None;
        }
        self.slots.get(number as usize)
    }

    pub fn get_mut(&mut self, number: u8) -> Option<&mut T> {
        if number == 0 {
            return None;
        }
        self.slots.get_mut(number as usize)
    }

    /// Same pool, new slot values.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> NumberMap<U> {
        NumberMap {
            slots: self.slots.iter().map(f).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &T)> {
        self.slots
            .iter()
            .enumerate()
            .skip(1)
            .map(|(n, v)| (n as u8, v))
    }

    /// Number of pool slots (i.e. `P`).
    pub fn len(&self) -> usize {
        self.slots.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Index<u8> for NumberMap<T> {
    type Output = T;

    fn index(&self, number: u8) -> &T {
        &self.slots[number as usize]
    }
}

impl<T> IndexMut<u8> for NumberMap<T> {
    fn index_mut(&mut self, number: u8) -> &mut T {
        &mut self.slots[number as usize]
    }
}

/// One historical observation: exactly `K` distinct pool numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draw {
    numbers: Vec<u8>,
}

impl Draw {
    pub fn new(numbers: Vec<u8>, pool: &Pool) -> Result<Self> {
        if numbers.len() != pool.draw_size {
            return Err(DrawkillError::InvalidDraw(format!(
                "expected {} numbers, got {}",
                pool.draw_size,
                numbers.len()
            )));
        }
        if let Some(&bad) = numbers.iter().find(|&&n| !pool.contains(n)) {
            return Err(DrawkillError::InvalidDraw(format!(
                "{} is outside the pool [1, {}]",
                bad, pool.size
            )));
        }
        let mut seen = numbers.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != numbers.len() {
            return Err(DrawkillError::InvalidDraw(format!(
                "duplicate numbers in {:?}",
                numbers
            )));
        }
        Ok(Self { numbers })
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }

    /// Values in ascending order; slot `s` of every row forms one positional series.
    pub fn sorted(&self) -> Vec<u8> {
        let mut sorted = self.numbers.clone();
        sorted.sort_unstable();
        sorted
    }

    pub fn sum(&self) -> u32 {
        self.numbers.iter().map(|&n| n as u32).sum()
    }
}

/// Chronologically ordered draw log; later index is more recent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct History {
    pool: Pool,
    draws: Vec<Draw>,
}

impl History {
    pub fn new(pool: Pool, draws: Vec<Draw>) -> Result<Self> {
        for (i, draw) in draws.iter().enumerate() {
            Draw::new(draw.numbers().to_vec(), &pool).map_err(|e| {
                DrawkillError::InvalidHistory(format!("row {}: {}", i, e))
            })?;
        }
        Ok(Self { pool, draws })
    }

    pub fn from_rows(pool: Pool, rows: Vec<Vec<u8>>) -> Result<Self> {
        let draws = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                Draw::new(row, &pool)
                    .map_err(|e| DrawkillError::InvalidHistory(format!("row {}: {}", i, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { pool, draws })
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// The first `end` draws (clamped to the history length).
    pub fn prefix(&self, end: usize) -> Prefix<'_> {
        Prefix {
            pool: &self.pool,
            draws: &self.draws[..end.min(self.draws.len())],
        }
    }

    pub fn view(&self) -> Prefix<'_> {
        self.prefix(self.draws.len())
    }
}

/// Read-only view over `history[0..i]`, the unit every strategy scores.
#[derive(Debug, Clone, Copy)]
pub struct Prefix<'a> {
    pub pool: &'a Pool,
    pub draws: &'a [Draw],
}

impl<'a> Prefix<'a> {
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn last(&self) -> Option<&'a Draw> {
        self.draws.last()
    }

    /// The most recent `rows` draws (all of them when fewer exist).
    pub fn window(&self, rows: usize) -> &'a [Draw] {
        let start = self.draws.len().saturating_sub(rows);
        &self.draws[start..]
    }
}

/// One scored entry of a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedNumber {
    pub number: u8,
    pub score: f64,
}

/// Total, non-negative scoring of the pool produced by one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRanking {
    scores: NumberMap<f64>,
}

impl ScoredRanking {
    pub fn new(pool: &Pool) -> Self {
        Self {
            scores: NumberMap::new(pool, 0.0),
        }
    }

    /// Stores a score, coercing NaN and negative values to 0. Out-of-pool numbers are ignored.
    pub fn set(&mut self, number: u8, score: f64) {
        let score = if score.is_finite() { score.max(0.0) } else { 0.0 };
        if let Some(slot) = self.scores.get_mut(number) {
            *slot = score;
        }
    }

    pub fn score(&self, number: u8) -> f64 {
        self.scores.get(number).copied().unwrap_or(0.0)
    }

    pub fn scores(&self) -> &NumberMap<f64> {
        &self.scores
    }

    /// All numbers, score descending, ties broken by ascending number.
    pub fn ranked(&self) -> Vec<RankedNumber> {
        let mut ranked: Vec<RankedNumber> = self
            .scores
            .iter()
            .map(|(number, &score)| RankedNumber { number, score })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.number.cmp(&b.number))
        });
        ranked
    }

    /// The best `limit` entries with a strictly positive score.
    pub fn top(&self, limit: usize) -> Vec<RankedNumber> {
        self.ranked()
            .into_iter()
            .filter(|r| r.score > 0.0)
            .take(limit)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Accumulated ensemble state for one number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub score: f64,
    pub contributors: Vec<String>,
}

impl Vote {
    pub fn add(&mut self, amount: f64, contributor: impl Into<String>) {
        if amount.is_finite() && amount > 0.0 {
            self.score += amount;
            self.contributors.push(contributor.into());
        }
    }
}

/// Accumulated "do not kill" evidence for one number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtectionRecord {
    pub score: f64,
    pub reasons: Vec<String>,
}

impl ProtectionRecord {
    pub fn add(&mut self, amount: f64, reason: impl Into<String>) {
        if amount.is_finite() && amount > 0.0 {
            self.score += amount;
            self.reasons.push(reason.into());
        }
    }
}

/// Backtest calibration record for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyStats {
    pub id: String,
    pub accuracy: f64,
    pub correct: usize,
    pub samples: usize,
}

impl StrategyStats {
    pub fn new(id: impl Into<String>, correct: usize, samples: usize) -> Self {
        let accuracy = if samples == 0 {
            0.0
        } else {
            correct as f64 / samples as f64
        };
        Self {
            id: id.into(),
            accuracy,
            correct,
            samples,
        }
    }

    /// Confidence weight used by the voter.
    pub fn weight(&self) -> f64 {
        self.accuracy * self.accuracy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnsembleMode {
    /// Backtest-weighted vote over the calibrated strategy group.
    Calibrated,
    /// Unweighted multi-signal combiner for short histories.
    Simple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillCandidate {
    pub number: u8,
    pub votes: usize,
    pub weight: f64,
    pub contributors: Vec<String>,
    pub protection: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub id: String,
    pub name: String,
    /// `None` when the strategy abstained for lack of history.
    pub candidates: Option<Vec<RankedNumber>>,
    pub stats: Option<StrategyStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectionEntry {
    pub number: u8,
    pub score: f64,
    pub factor: f64,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectionStats {
    pub accuracy: f64,
    pub correct: usize,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub window: usize,
    pub strategies: Vec<StrategyStats>,
    pub protection: ProtectionStats,
}

/// Complete kill recommendation for the draw following a history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillReport {
    pub mode: EnsembleMode,
    pub history_len: usize,
    pub overall: Vec<KillCandidate>,
    pub per_strategy: Vec<StrategyOutcome>,
    pub protection: Vec<ProtectionEntry>,
    pub backtest: Option<BacktestReport>,
    pub generated_at: String,
}

impl KillReport {
    pub fn numbers(&self) -> Vec<u8> {
        self.overall.iter().map(|c| c.number).collect()
    }
}

/// Forward predictor outputs; `None` where a predictor lacked history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForwardPrediction {
    pub b: Option<Vec<u8>>,
    pub c: Option<Vec<u8>>,
    pub i: Option<Vec<u8>>,
    pub m: Option<Vec<u8>>,
    pub n: Option<Vec<u8>>,
}
