use crate::types::{KillCandidate, Pool, TAILS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Constraint {
    ZoneAndTail,
    ZoneOnly,
    Unconstrained,
}

/// Greedy top-N selection with per-zone and per-tail caps.
///
/// The caps are relaxed in two steps (tail cap first, then both) until the
/// target size is met or the candidates run out.
pub struct DiversitySelector {
    size: usize,
    zone_cap: usize,
    tail_cap: usize,
}

struct Tally {
    chosen: Vec<bool>,
    zones: Vec<usize>,
    tails: [usize; TAILS],
    picked: usize,
}

impl DiversitySelector {
    pub fn new(size: usize, zone_cap: usize, tail_cap: usize) -> Self {
        Self {
            size,
            zone_cap,
            tail_cap,
        }
    }

    /// `candidates` must be sorted strongest first; the result keeps that order.
    pub fn select(&self, pool: &Pool, candidates: &[KillCandidate]) -> Vec<KillCandidate> {
        let mut tally = Tally {
            chosen: vec![false; candidates.len()],
            zones: vec![0; pool.zones],
            tails: [0; TAILS],
            picked: 0,
        };

        for constraint in [
            Constraint::ZoneAndTail,
            Constraint::ZoneOnly,
            Constraint::Unconstrained,
        ] {
            if tally.picked >= self.size {
                break;
            }
            if constraint != Constraint::ZoneAndTail {
                log::warn!(
                    "Diversity pass relaxed to {:?} with {}/{} picks",
                    constraint,
                    tally.picked,
                    self.size
                );
            }
            self.sweep(pool, candidates, &mut tally, constraint);
        }

        candidates
            .iter()
            .zip(&tally.chosen)
            .filter(|(_, chosen)| **chosen)
            .map(|(c, _)| c.clone())
            .collect()
    }

    fn sweep(&self, pool: &Pool, candidates: &[KillCandidate], tally: &mut Tally, constraint: Constraint) {
        for (index, candidate) in candidates.iter().enumerate() {
            if tally.picked >= self.size {
                return;
            }
            if tally.chosen[index] {
                continue;
            }
            let zone = pool.zone_of(candidate.number);
            let tail = pool.tail_of(candidate.number);
            let allowed = match constraint {
                Constraint::ZoneAndTail => {
                    tally.zones[zone] < self.zone_cap && tally.tails[tail] < self.tail_cap
                }
                Constraint::ZoneOnly => tally.zones[zone] < self.zone_cap,
                Constraint::Unconstrained => true,
            };
            if allowed {
                tally.chosen[index] = true;
                tally.zones[zone] += 1;
                tally.tails[tail] += 1;
                tally.picked += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Candidates in the given order with strictly decreasing weight.
    fn candidates(numbers: impl Iterator<Item = u8>) -> Vec<KillCandidate> {
        numbers
            .enumerate()
            .map(|(i, number)| KillCandidate {
                number,
                votes: 1,
                weight: 100.0 - i as f64,
                contributors: vec!["S1".to_string()],
                protection: None,
            })
            .collect()
    }

    fn numbers(selected: &[KillCandidate]) -> Vec<u8> {
        selected.iter().map(|c| c.number).collect()
    }

    #[test]
    fn test_caps_hold_when_satisfiable() {
        let pool = Pool::default();
        let selected = DiversitySelector::new(10, 3, 2).select(&pool, &candidates(1..=49));

        assert_eq!(numbers(&selected), vec![1, 2, 3, 11, 12, 13, 24, 25, 26, 34]);
    }

    #[test]
    fn test_relaxes_until_target_is_met() {
        let pool = Pool::default();
        let selected = DiversitySelector::new(10, 3, 2).select(&pool, &candidates(1..=20));

        assert_eq!(numbers(&selected), vec![1, 2, 3, 4, 5, 6, 7, 11, 12, 13]);
    }

    #[test]
    fn test_tail_cap_relaxed_before_zone_cap() {
        let pool = Pool::default();
        let order = [1, 11, 21, 31, 41, 2, 12, 22, 32, 42, 3];
        let selected = DiversitySelector::new(10, 3, 2).select(&pool, &candidates(order.into_iter()));

        // both caps admit only 1, 11, 2, 12, 3; the zone-only sweep fills the rest
        assert_eq!(numbers(&selected), vec![1, 11, 21, 31, 41, 2, 12, 22, 32, 3]);

        let mut zones = vec![0; pool.zones];
        let mut tails = [0; TAILS];
        for c in &selected {
            zones[pool.zone_of(c.number)] += 1;
            tails[pool.tail_of(c.number)] += 1;
        }
        assert!(zones.iter().all(|&z| z <= 3));
        assert_eq!(tails[1], 5);
    }

    #[test]
    fn test_short_candidate_list() {
        let pool = Pool::default();
        let selected = DiversitySelector::new(10, 3, 2).select(&pool, &candidates([5, 9, 40].into_iter()));
        assert_eq!(numbers(&selected), vec![5, 9, 40]);
    }
}
