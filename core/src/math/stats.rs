use serde::Serialize;

/// Slope and intercept of a fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

pub struct StatsHelper;

impl StatsHelper {
    /// Sum starting from `+0.0`; `Iterator::sum` on floats yields `-0.0` for no input.
    pub fn sum(values: &[f64]) -> f64 {
        values.iter().fold(0.0, |acc, v| acc + v)
    }

    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(Self::sum(values) / values.len() as f64)
    }

    pub fn max(values: &[f64]) -> Option<f64> {
        values.iter().copied().reduce(f64::max)
    }

    pub fn min(values: &[f64]) -> Option<f64> {
        values.iter().copied().reduce(f64::min)
    }

    /// Ordinary least-squares fit of `ys` on `xs`.
    ///
    /// Returns `None` for fewer than two points, mismatched lengths, or when the
    /// spread of `xs` vanishes relative to their magnitude.
    pub fn least_squares(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
        if xs.len() < 2 || xs.len() != ys.len() {
            return None;
        }
        let mean_x = Self::mean(xs)?;
        let mean_y = Self::mean(ys)?;

        let (sxx, sxy) = xs
            .iter()
            .zip(ys)
            .fold((0.0, 0.0), |(sxx, sxy), (&x, &y)| {
                let dx = x - mean_x;
                (sxx + dx * dx, sxy + dx * (y - mean_y))
            });
        let scale: f64 = xs.iter().map(|x| x * x).sum();
        if !(sxx > f64::EPSILON * scale) {
            return None;
        }

        let slope = sxy / sxx;
        Some(LinearFit {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }
}
