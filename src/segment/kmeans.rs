//! Lloyd's k-means over 3-component colour samples.
//!
//! Seeding uses k-means++ driven by a seeded `StdRng`, so a fixed `seed`
//! gives reproducible output. Every attempt iterates until the largest
//! centroid shift drops to `epsilon` or `max_iter` passes elapse; the attempt
//! with the lowest compactness (sum of squared distances) wins.
//!
//! An empty cluster is reseeded to the sample farthest from its current
//! centroid, which keeps every update a well-defined mean.
use crate::error::{CatalogError, Result};
use crate::filters::for_each_row_mut;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub type Sample = [f32; 3];

const ASSIGN_CHUNK: usize = 4096;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansParams {
    /// Number of clusters.
    pub k: usize,
    /// Iteration cap per attempt.
    pub max_iter: usize,
    /// Convergence threshold on the largest centroid shift (Euclidean).
    pub epsilon: f32,
    /// Independent restarts; the most compact result is kept.
    pub attempts: usize,
    /// Seed of the k-means++ sampler.
    pub seed: u64,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            k: 3,
            max_iter: 100,
            epsilon: 0.2,
            attempts: 10,
            seed: 0x6b6d_6561_6e73,
        }
    }
}

/// Per-sample labels in `[0, k)` plus the `k` centroids.
#[derive(Clone, Debug)]
pub struct ClusterAssignment {
    pub labels: Vec<usize>,
    pub centers: Vec<Sample>,
    pub compactness: f64,
    /// Lloyd iterations executed by the winning attempt.
    pub iterations: usize,
}

impl ClusterAssignment {
    /// Number of clusters that own at least one sample.
    pub fn populated_clusters(&self) -> usize {
        let mut seen = vec![false; self.centers.len()];
        for &l in &self.labels {
            seen[l] = true;
        }
        seen.iter().filter(|&&s| s).count()
    }
}

#[inline]
fn dist2(a: &Sample, b: &Sample) -> f32 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    d0 * d0 + d1 * d1 + d2 * d2
}

/// Index of the closest centre; ties go to the lower index.
#[inline]
fn nearest(sample: &Sample, centers: &[Sample]) -> (usize, f32) {
    let mut best = (0, f32::INFINITY);
    for (i, c) in centers.iter().enumerate() {
        let d = dist2(sample, c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

/// Cluster `samples` into `params.k` groups.
///
/// `k` larger than the sample count is clamped to it.
pub fn kmeans(samples: &[Sample], params: &KMeansParams) -> Result<ClusterAssignment> {
    if samples.is_empty() {
        return Err(CatalogError::invalid("k-means needs at least one sample"));
    }
    if params.k == 0 || params.attempts == 0 {
        return Err(CatalogError::invalid(format!(
            "k-means needs k >= 1 and attempts >= 1 (k={}, attempts={})",
            params.k, params.attempts
        )));
    }
    if !params.epsilon.is_finite() {
        return Err(CatalogError::invalid("k-means epsilon must be finite"));
    }
    let k = params.k.min(samples.len());
    if k < params.k {
        debug!("k-means: clamping k from {} to {} samples", params.k, k);
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut best: Option<ClusterAssignment> = None;
    for attempt in 0..params.attempts {
        let centers = seed_plus_plus(samples, k, &mut rng);
        let result = lloyd(samples, centers, params);
        debug!(
            "k-means attempt {}: compactness={:.3} iterations={}",
            attempt, result.compactness, result.iterations
        );
        let better = best
            .as_ref()
            .map_or(true, |b| result.compactness < b.compactness);
        if better {
            best = Some(result);
        }
    }
    best.ok_or_else(|| CatalogError::invalid("k-means produced no result"))
}

/// k-means++ seeding: each new centre is drawn with probability proportional
/// to the squared distance to the nearest existing centre.
fn seed_plus_plus(samples: &[Sample], k: usize, rng: &mut StdRng) -> Vec<Sample> {
    let n = samples.len();
    let mut centers = Vec::with_capacity(k);
    centers.push(samples[rng.gen_range(0..n)]);
    let mut d2: Vec<f32> = samples.iter().map(|s| dist2(s, &centers[0])).collect();

    while centers.len() < k {
        let total: f64 = d2.iter().map(|&d| d as f64).sum();
        let pick = if total <= 0.0 {
            // every sample coincides with a centre already
            rng.gen_range(0..n)
        } else {
            let mut target = rng.gen::<f64>() * total;
            let mut chosen = n - 1;
            for (i, &d) in d2.iter().enumerate() {
                target -= d as f64;
                if target <= 0.0 && d > 0.0 {
                    chosen = i;
                    break;
                }
            }
            chosen
        };
        let c = samples[pick];
        for (d, s) in d2.iter_mut().zip(samples) {
            *d = d.min(dist2(s, &c));
        }
        centers.push(c);
    }
    centers
}

fn assign(samples: &[Sample], centers: &[Sample], labels: &mut [usize]) {
    for_each_row_mut(labels, ASSIGN_CHUNK, |chunk_idx, chunk| {
        let base = chunk_idx * ASSIGN_CHUNK;
        for (j, label) in chunk.iter_mut().enumerate() {
            *label = nearest(&samples[base + j], centers).0;
        }
    });
}

fn lloyd(samples: &[Sample], mut centers: Vec<Sample>, params: &KMeansParams) -> ClusterAssignment {
    let k = centers.len();
    let eps2 = params.epsilon.max(0.0).powi(2);
    let mut labels = vec![0usize; samples.len()];
    let mut iterations = 0;

    for _ in 0..params.max_iter.max(1) {
        iterations += 1;
        assign(samples, &centers, &mut labels);

        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (s, &l) in samples.iter().zip(&labels) {
            counts[l] += 1;
            for c in 0..3 {
                sums[l][c] += s[c] as f64;
            }
        }

        let mut updated = centers.clone();
        for ci in 0..k {
            if counts[ci] == 0 {
                let far = farthest_sample(samples, &labels, &centers);
                debug!("k-means: cluster {} empty, reseeding to sample {}", ci, far);
                updated[ci] = samples[far];
                continue;
            }
            let n = counts[ci] as f64;
            updated[ci] = [
                (sums[ci][0] / n) as f32,
                (sums[ci][1] / n) as f32,
                (sums[ci][2] / n) as f32,
            ];
        }

        let max_shift = centers
            .iter()
            .zip(&updated)
            .map(|(a, b)| dist2(a, b))
            .fold(0.0f32, f32::max);
        centers = updated;
        if max_shift <= eps2 {
            break;
        }
    }

    assign(samples, &centers, &mut labels);
    let compactness = samples
        .iter()
        .zip(&labels)
        .map(|(s, &l)| dist2(s, &centers[l]) as f64)
        .sum();

    ClusterAssignment {
        labels,
        centers,
        compactness,
        iterations,
    }
}

fn farthest_sample(samples: &[Sample], labels: &[usize], centers: &[Sample]) -> usize {
    let mut best = (0, -1.0f32);
    for (i, (s, &l)) in samples.iter().zip(labels).enumerate() {
        let d = dist2(s, &centers[l]);
        if d > best.1 {
            best = (i, d);
        }
    }
    best.0
}
