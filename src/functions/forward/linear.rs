use crate::functions::{stats, traits::ForwardPredictor};
use crate::types::Prefix;

/// Ordinary least squares `value = slope * t + intercept`; zero variance in `t` gives slope 0.
pub fn fit_line(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let t_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (t, y) in values.iter().enumerate() {
        let dt = t as f64 - t_mean;
        sxy += dt * (y - y_mean);
        sxx += dt * dt;
    }
    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    (slope, y_mean - slope * t_mean)
}

/// B: per positional slot, extrapolate the fitted line one step ahead.
pub struct LinearFit;

impl ForwardPredictor for LinearFit {
    fn alias(&self) -> &'static str {
        "B"
    }

    fn ui_name(&self) -> &'static str {
        "Linear Fit"
    }

    fn min_rows(&self) -> usize {
        2
    }

    fn calculate(&self, prefix: &Prefix<'_>) -> Vec<u8> {
        let pool = prefix.pool;
        stats::slot_series(prefix.draws, pool)
            .iter()
            .map(|values| {
                let (slope, intercept) = fit_line(values);
                pool.clamp(slope * values.len() as f64 + intercept)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{History, Pool};

    #[test]
    fn test_fit_line() {
        let (slope, intercept) = fit_line(&[1.0, 3.0, 5.0]);
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
        assert_eq!(fit_line(&[4.0]), (0.0, 4.0));
    }

    #[test]
    fn test_linear_extrapolation_is_clamped() {
        let rows = vec![
            vec![1, 2, 3, 4, 5, 6, 7],
            vec![8, 9, 10, 11, 12, 13, 14],
            vec![15, 16, 17, 18, 19, 20, 49],
        ];
        let history = History::from_rows(Pool::default(), rows).unwrap();
        let b = LinearFit.predict(&history.view()).unwrap();

        assert_eq!(b[0], 22);
        assert_eq!(b[5], 27);
        assert_eq!(b[6], 49);
    }

    #[test]
    fn test_single_row_abstains() {
        let history = History::from_rows(Pool::default(), vec![vec![1, 2, 3, 4, 5, 6, 7]]).unwrap();
        assert!(LinearFit.predict(&history.view()).is_none());
    }
}
