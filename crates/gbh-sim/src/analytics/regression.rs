use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::data::records::DailyFinancialRecord;
use crate::error::{require_rows, SimError, SimResult};

pub const MIN_REGRESSION_ROWS: usize = 10;
pub const DEFAULT_FORECAST_HORIZON: usize = 30;
const Z_95: f64 = 1.96;

/// Least-squares fit of `y = X·β`.
#[derive(Clone, Debug, PartialEq)]
pub struct OlsFit {
    pub coefficients: Vec<f64>,
    pub std_errors: Vec<f64>,
    pub residual_sum_of_squares: f64,
    pub observations: usize,
}

/// Fits `y` on the row-major `design` matrix. `None` when the system is
/// singular or has no residual degrees of freedom.
pub fn fit_ols(design: &[Vec<f64>], y: &[f64]) -> Option<OlsFit> {
    let n = y.len();
    let k = design.first()?.len();
    if design.len() != n || n <= k || k == 0 {
        return None;
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, target) in design.iter().zip(y) {
        for i in 0..k {
            xty[i] += row[i] * target;
            for j in 0..k {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    let inverse = invert(xtx)?;
    let coefficients = (0..k)
        .map(|i| (0..k).map(|j| inverse[i][j] * xty[j]).sum::<f64>())
        .collect::<Vec<_>>();
    let rss: f64 = design
        .iter()
        .zip(y)
        .map(|(row, target)| {
            let fitted: f64 = row.iter().zip(&coefficients).map(|(x, b)| x * b).sum();
            (target - fitted).powi(2)
        })
        .sum();
    let sigma2 = rss / (n - k) as f64;
    let std_errors = (0..k).map(|i| (sigma2 * inverse[i][i]).max(0.0).sqrt()).collect();

    Some(OlsFit {
        coefficients,
        std_errors,
        residual_sum_of_squares: rss,
        observations: n,
    })
}

/// Gauss-Jordan elimination with partial pivoting.
fn invert(mut m: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let k = m.len();
    let mut inv = (0..k)
        .map(|i| (0..k).map(|j| if i == j { 1.0 } else { 0.0 }).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    for col in 0..k {
        let pivot = (col..k).max_by(|&a, &b| {
            m[a][col]
                .abs()
                .partial_cmp(&m[b][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if m[pivot][col].abs() < 1e-12 {
            return None;
        }
        m.swap(col, pivot);
        inv.swap(col, pivot);

        let p = m[col][col];
        for j in 0..k {
            m[col][j] /= p;
            inv[col][j] /= p;
        }
        for row in 0..k {
            if row == col {
                continue;
            }
            let factor = m[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..k {
                m[row][j] -= factor * m[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }
    Some(inv)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendRegression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub slope_std_error: f64,
    /// `None` for a perfect fit.
    pub slope_t_statistic: Option<f64>,
    pub forecast: Vec<ForecastPoint>,
}

/// Linear trend of cumulative revenue against day index, projected
/// `horizon` days past the last record.
pub fn revenue_trend(
    financial: &[DailyFinancialRecord],
    horizon: usize,
) -> SimResult<TrendRegression> {
    require_rows("trend regression", MIN_REGRESSION_ROWS, financial.len())?;
    let Some(last) = financial.last() else {
        return Err(SimError::InvalidArgument("empty series".to_string()));
    };

    let n = financial.len();
    let xs = (0..n).map(|i| i as f64).collect::<Vec<_>>();
    let ys = financial
        .iter()
        .map(|r| r.cumulative_revenue)
        .collect::<Vec<_>>();
    let design = xs.iter().map(|x| vec![1.0, *x]).collect::<Vec<_>>();
    let fit = fit_ols(&design, &ys).ok_or_else(|| {
        SimError::InvalidArgument("trend regression is singular".to_string())
    })?;

    let (intercept, slope) = (fit.coefficients[0], fit.coefficients[1]);
    let slope_std_error = fit.std_errors[1];
    let y_mean = ys.iter().sum::<f64>() / n as f64;
    let total_ss: f64 = ys.iter().map(|y| (y - y_mean).powi(2)).sum();
    let r_squared = if total_ss > 0.0 {
        1.0 - fit.residual_sum_of_squares / total_ss
    } else {
        1.0
    };

    let x_mean = (n - 1) as f64 / 2.0;
    let sxx: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
    let forecast = (1..=horizon)
        .map(|step| {
            let x = (n - 1 + step) as f64;
            let value = intercept + slope * x;
            let band =
                Z_95 * slope_std_error * (1.0 / n as f64 + (x - x_mean).powi(2) / sxx).sqrt();
            ForecastPoint {
                date: last.date + Duration::days(step as i64),
                value,
                lower: value - band,
                upper: value + band,
            }
        })
        .collect();

    Ok(TrendRegression {
        slope,
        intercept,
        r_squared,
        slope_std_error,
        slope_t_statistic: (slope_std_error > 0.0).then(|| slope / slope_std_error),
        forecast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ols_recovers_exact_line() {
        let design = (0..10).map(|i| vec![1.0, i as f64]).collect::<Vec<_>>();
        let y = (0..10).map(|i| 3.0 + 2.0 * i as f64).collect::<Vec<_>>();
        let fit = fit_ols(&design, &y).expect("fit");
        assert!((fit.coefficients[0] - 3.0).abs() < 1e-9);
        assert!((fit.coefficients[1] - 2.0).abs() < 1e-9);
        assert!(fit.residual_sum_of_squares < 1e-9);
    }

    #[test]
    fn ols_rejects_collinear_design() {
        let design = (0..10).map(|i| vec![i as f64, 2.0 * i as f64]).collect::<Vec<_>>();
        let y = (0..10).map(|i| i as f64).collect::<Vec<_>>();
        assert!(fit_ols(&design, &y).is_none());
    }
}
