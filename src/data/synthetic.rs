use crate::error::Result;
use crate::types::{Draw, History, Pool};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

/// Seeded generator of uniformly random, valid histories.
pub struct SyntheticHistory {
    pool: Pool,
    rng: StdRng,
}

impl SyntheticHistory {
    pub fn new(pool: Pool, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { pool, rng }
    }

    pub fn next_draw(&mut self) -> Result<Draw> {
        let numbers = index::sample(&mut self.rng, self.pool.size as usize, self.pool.draw_size)
            .into_iter()
            .map(|i| (i + 1) as u8)
            .collect();
        Draw::new(numbers, &self.pool)
    }

    pub fn generate(&mut self, rows: usize) -> Result<History> {
        let draws = (0..rows)
            .map(|_| self.next_draw())
            .collect::<Result<Vec<_>>>()?;
        History::new(self.pool, draws)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = SyntheticHistory::new(Pool::default(), Some(7)).generate(30).unwrap();
        let b = SyntheticHistory::new(Pool::default(), Some(7)).generate(30).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 30);
        assert!(a.draws().iter().all(|d| d.numbers().len() == 7));
    }
}
