//! K-means segmentation of territories on standardised performance features.

use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use linfa_nn::distance::L2Dist;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::data::records::TerritoryPerformance;
use crate::error::{require_rows, SimError, SimResult};
use crate::stats::mean;

pub const MIN_CLUSTER_ROWS: usize = 5;
pub const CLUSTER_COUNT: usize = 3;
const LABELS: [&str; CLUSTER_COUNT] = ["High Performers", "Stable", "Development Needed"];

pub const FEATURES: [&str; 5] = [
    "revenue",
    "growth_pct",
    "satisfaction",
    "profitability_pct",
    "basket_size",
];

fn feature_matrix(territories: &[TerritoryPerformance]) -> SimResult<Array2<f64>> {
    let flat = territories
        .iter()
        .flat_map(|t| {
            [
                t.revenue,
                t.growth_pct,
                t.satisfaction,
                t.profitability_pct,
                t.basket_size,
            ]
        })
        .collect::<Vec<_>>();
    Array2::from_shape_vec((territories.len(), FEATURES.len()), flat)
        .map_err(|e| SimError::InvalidArgument(format!("feature matrix: {e}")))
}

/// Z-scores per column with population standard deviation; constant
/// columns map to zero.
pub fn standardize(raw: &Array2<f64>) -> Array2<f64> {
    let Some(means) = raw.mean_axis(Axis(0)) else {
        return raw.clone();
    };
    let stds = raw.std_axis(Axis(0), 0.0);
    let mut z = raw - &means;
    for (mut column, std) in z.axis_iter_mut(Axis(1)).zip(stds.iter()) {
        if *std > 0.0 {
            column /= *std;
        } else {
            column.fill(0.0);
        }
    }
    z
}

#[derive(Clone, Debug, PartialEq)]
pub struct KMeansFit {
    pub assignments: Vec<usize>,
    pub inertia: f64,
}

/// k-means++ initialisation, best of 10 runs, at most 300 iterations; the
/// model's generator is seeded with 42 so fits are repeatable.
pub fn fit_kmeans(points: &Array2<f64>, k: usize) -> SimResult<KMeansFit> {
    let dataset = DatasetBase::from(points.clone());
    let model: KMeans<f64, L2Dist> = KMeans::params(k)
        .fit(&dataset)
        .map_err(|e| SimError::InvalidArgument(format!("k-means with k={k} failed: {e}")))?;
    let assignments = model.predict(&dataset).iter().copied().collect();
    Ok(KMeansFit {
        assignments,
        inertia: model.inertia(),
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterProfile {
    pub cluster: usize,
    pub label: String,
    pub size: usize,
    pub mean_revenue: f64,
    pub mean_growth_pct: f64,
    pub mean_satisfaction: f64,
    pub territories: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerritoryClusters {
    pub features: Vec<String>,
    /// Inertia for k = 2.. (elbow curve).
    pub elbow: Vec<(usize, f64)>,
    pub inertia: f64,
    /// Cluster index per territory, in input order.
    pub assignments: Vec<usize>,
    /// Ordered by descending mean revenue; index equals cluster id.
    pub profiles: Vec<ClusterProfile>,
}

pub fn cluster_territories(territories: &[TerritoryPerformance]) -> SimResult<TerritoryClusters> {
    require_rows("territory clustering", MIN_CLUSTER_ROWS, territories.len())?;

    let points = standardize(&feature_matrix(territories)?);

    let elbow = (2..territories.len().min(6))
        .map(|k| fit_kmeans(&points, k).map(|fit| (k, fit.inertia)))
        .collect::<SimResult<Vec<_>>>()?;

    let fit = fit_kmeans(&points, CLUSTER_COUNT)?;

    // Relabel raw cluster ids so id 0 is the highest-revenue group.
    let mut by_revenue = (0..CLUSTER_COUNT)
        .map(|c| {
            let revenue = territories
                .iter()
                .zip(&fit.assignments)
                .filter(|(_, a)| **a == c)
                .map(|(t, _)| t.revenue)
                .collect::<Vec<_>>();
            (c, mean(&revenue).unwrap_or(f64::NEG_INFINITY))
        })
        .collect::<Vec<_>>();
    by_revenue.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut rank_of = [0usize; CLUSTER_COUNT];
    for (rank, (raw_id, _)) in by_revenue.iter().enumerate() {
        rank_of[*raw_id] = rank;
    }
    let assignments = fit
        .assignments
        .iter()
        .map(|a| rank_of[*a])
        .collect::<Vec<_>>();

    let profiles = (0..CLUSTER_COUNT)
        .map(|cluster| {
            let members = territories
                .iter()
                .zip(&assignments)
                .filter(|(_, a)| **a == cluster)
                .map(|(t, _)| t)
                .collect::<Vec<_>>();
            let field_mean = |f: fn(&TerritoryPerformance) -> f64| {
                mean(&members.iter().map(|m| f(m)).collect::<Vec<_>>()).unwrap_or(0.0)
            };
            ClusterProfile {
                cluster,
                label: LABELS[cluster].to_string(),
                size: members.len(),
                mean_revenue: field_mean(|t| t.revenue),
                mean_growth_pct: field_mean(|t| t.growth_pct),
                mean_satisfaction: field_mean(|t| t.satisfaction),
                territories: members.iter().map(|t| t.territory.clone()).collect(),
            }
        })
        .collect();

    Ok(TerritoryClusters {
        features: FEATURES.iter().map(|f| f.to_string()).collect(),
        elbow,
        inertia: fit.inertia,
        assignments,
        profiles,
    })
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn separates_well_spaced_groups() {
        let points = array![
            [0.0, 0.0],
            [0.1, 0.0],
            [10.0, 10.0],
            [10.1, 10.0],
            [-10.0, 10.0],
            [-10.1, 10.0],
        ];
        let fit = fit_kmeans(&points, 3).expect("fit");
        let a = &fit.assignments;
        assert_eq!(a[0], a[1]);
        assert_eq!(a[2], a[3]);
        assert_eq!(a[4], a[5]);
        assert_ne!(a[0], a[2]);
        assert_ne!(a[2], a[4]);
        assert!(fit.inertia < 0.1);
    }

    #[test]
    fn standardized_columns_have_zero_mean() {
        let z = standardize(&array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]]);
        assert!(z.column(0).sum().abs() < 1e-12);
        assert!(z.column(1).iter().all(|v| *v == 0.0));
    }
}
