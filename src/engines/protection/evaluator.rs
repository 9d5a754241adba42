use crate::config::ProtectionConfig;
use crate::functions::stats;
use crate::types::{NumberMap, Prefix, ProtectionEntry, ProtectionRecord};

/// Per-number "do not kill" evidence, kept apart from the kill strategies and
/// merged into the vote once as a multiplicative discount.
pub struct ProtectionEvaluator {
    config: ProtectionConfig,
}

impl ProtectionEvaluator {
    pub fn new(config: ProtectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProtectionConfig {
        &self.config
    }

    pub fn evaluate(&self, prefix: &Prefix<'_>) -> NumberMap<ProtectionRecord> {
        let mut records = NumberMap::new(prefix.pool, ProtectionRecord::default());
        if prefix.is_empty() {
            return records;
        }
        self.repeat_rate(prefix, &mut records);
        self.overdue(prefix, &mut records);
        self.rising_trend(prefix, &mut records);
        self.cyclic(prefix, &mut records);
        self.burst_silence(prefix, &mut records);
        records
    }

    /// `max(floor, 1 - score * scale)`
    pub fn discount_factor(&self, score: f64) -> f64 {
        self.config.discount_factor(score)
    }

    /// Protected numbers only, strongest first.
    pub fn entries(&self, records: &NumberMap<ProtectionRecord>) -> Vec<ProtectionEntry> {
        let mut entries: Vec<ProtectionEntry> = records
            .iter()
            .filter(|(_, r)| r.score > 0.0)
            .map(|(number, r)| ProtectionEntry {
                number,
                score: r.score,
                factor: self.discount_factor(r.score),
                reasons: r.reasons.clone(),
            })
            .collect();
        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.number.cmp(&b.number))
        });
        entries
    }

    fn repeat_rate(&self, prefix: &Prefix<'_>, records: &mut NumberMap<ProtectionRecord>) {
        let Some(last) = prefix.last() else {
            return;
        };
        for &n in last.numbers() {
            let (repeats, samples) = stats::repeat_counts(prefix.draws, n);
            let rate = if samples >= self.config.repeat_min_samples {
                repeats as f64 / samples as f64
            } else {
                self.config.repeat_prior
            };
            if rate >= self.config.repeat_min_rate {
                records[n].add(rate * self.config.repeat_scale, format!("repeat rate {:.2}", rate));
            }
        }
    }

    fn overdue(&self, prefix: &Prefix<'_>, records: &mut NumberMap<ProtectionRecord>) {
        for n in prefix.pool.numbers() {
            let indices = stats::appearances(prefix.draws, n);
            if indices.len() < self.config.overdue_min_appearances {
                continue;
            }
            let (Some(average), Some(miss)) =
                (stats::mean_gap(&indices), stats::miss_streak(prefix.draws, n))
            else {
                continue;
            };
            if average > 0.0 && miss as f64 > self.config.overdue_multiple * average {
                let urgency = miss as f64 / average;
                records[n].add(
                    (urgency * self.config.overdue_scale).min(self.config.overdue_cap),
                    format!("overdue {:.1}x average gap", urgency),
                );
            }
        }
    }

    fn rising_trend(&self, prefix: &Prefix<'_>, records: &mut NumberMap<ProtectionRecord>) {
        let window = self.config.trend_window;
        if prefix.len() < 2 * window {
            return;
        }
        let recent = prefix.window(window);
        let end = prefix.len() - window;
        let previous = &prefix.draws[end - window..end];
        let recent_counts = stats::counts(recent, prefix.pool);
        let previous_counts = stats::counts(previous, prefix.pool);

        for n in prefix.pool.numbers() {
            let delta = recent_counts[n] as i64 - previous_counts[n] as i64;
            if delta > self.config.trend_min_delta {
                records[n].add(delta as f64 * self.config.trend_scale, format!("rising trend +{}", delta));
            }
        }
    }

    fn cyclic(&self, prefix: &Prefix<'_>, records: &mut NumberMap<ProtectionRecord>) {
        for n in prefix.pool.numbers() {
            let indices = stats::appearances(prefix.draws, n);
            if indices.len() < self.config.cyclic_min_appearances {
                continue;
            }
            let Some((average, std)) = stats::mean_std(&stats::gaps(&indices)) else {
                continue;
            };
            let Some(miss) = stats::miss_streak(prefix.draws, n) else {
                continue;
            };
            if average <= 0.0 {
                continue;
            }
            let cv = std / average;
            let miss = miss as f64;
            if cv >= self.config.cyclic_max_cv
                || miss < self.config.cyclic_low * average
                || miss > self.config.cyclic_high * average
            {
                continue;
            }
            let nearness = (1.0 - (miss / average - 1.0).abs()).max(0.0);
            let score = nearness * (1.0 - cv);
            if score > self.config.cyclic_min_score {
                records[n].add(score, format!("regular cycle, cv {:.2}", cv));
            }
        }
    }

    fn burst_silence(&self, prefix: &Prefix<'_>, records: &mut NumberMap<ProtectionRecord>) {
        for n in prefix.pool.numbers() {
            let Some(run) = stats::latest_run(prefix.draws, n) else {
                continue;
            };
            if run.len < self.config.burst_min_len || run.silence == 0 {
                continue;
            }
            let ratio = run.silence as f64 / run.len as f64;
            if ratio >= self.config.burst_silence_low && ratio <= self.config.burst_silence_high {
                records[n].add(
                    (ratio * self.config.burst_scale).min(self.config.burst_cap),
                    format!("silent {}x after a {}-row burst", run.silence / run.len, run.len),
                );
            }
        }
    }
}
