use crate::config::strategies::WindowParams;
use crate::functions::traits::KillStrategy;
use crate::types::{Prefix, ScoredRanking};

/// S4: zones colder than the hottest zone, scaled against it.
pub struct ZoneCold {
    params: WindowParams,
}

impl ZoneCold {
    pub fn new(params: WindowParams) -> Self {
        Self { params }
    }
}

impl KillStrategy for ZoneCold {
    fn alias(&self) -> &'static str {
        "S4"
    }

    fn ui_name(&self) -> &'static str {
        "Zone Cold"
    }

    fn min_rows(&self) -> usize {
        5
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> ScoredRanking {
        let pool = prefix.pool;
        let window = prefix.window(self.params.window);

        let mut hits = vec![0u32; pool.zones];
        for draw in window {
            for &n in draw.numbers() {
                hits[pool.zone_of(n)] += 1;
            }
        }
        let density: Vec<f64> = hits
            .iter()
            .enumerate()
            .map(|(z, &h)| h as f64 / pool.zone_size(z).max(1) as f64)
            .collect();
        let hottest = density.iter().copied().fold(0.0, f64::max);

        let mut ranking = ScoredRanking::new(pool);
        if hottest <= 0.0 {
            return ranking;
        }
        for n in pool.numbers() {
            let d = density[pool.zone_of(n)];
            ranking.set(n, (hottest - d) / hottest);
        }
        ranking
    }
}
