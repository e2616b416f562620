//! Isolation forest outlier scorer
//!
//! Outliers are isolated by fewer random axis-aligned cuts than inliers, so
//! a short average path length across the ensemble means a high anomaly
//! score. Scores follow the usual normalisation `2^(-E[h(x)] / c(psi))`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Isolation forest hyperparameters
#[derive(Debug, Clone, PartialEq)]
pub struct IsolationParams {
    /// Number of isolation trees
    pub trees: usize,
    /// RNG seed for sub-sampling and cuts
    pub seed: u64,
    /// Upper bound on rows drawn per tree
    pub max_samples: usize,
}

impl Default for IsolationParams {
    fn default() -> Self {
        Self {
            trees: 100,
            seed: 42,
            max_samples: 256,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
struct IsolationTree {
    nodes: Vec<Node>,
    root: usize,
}

impl IsolationTree {
    fn path_length(&self, row: &[f64]) -> f64 {
        let mut idx = self.root;
        let mut depth = 0.0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                    depth += 1.0;
                }
            }
        }
    }
}

/// A fitted isolation forest
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
}

impl IsolationForest {
    /// Fit on `rows`; `params.trees` must be at least 1
    pub fn fit(rows: &[Vec<f64>], params: &IsolationParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let n = rows.len();
        let sample_size = params.max_samples.max(1).min(n.max(1));
        let depth_limit = (sample_size as f64).log2().ceil() as usize;

        let trees = (0..params.trees)
            .map(|_| {
                let samples =
                    rand::seq::index::sample(&mut rng, n, sample_size.min(n)).into_vec();
                let mut builder = IsolationBuilder {
                    rows,
                    depth_limit,
                    rng: &mut rng,
                    nodes: Vec::new(),
                };
                let root = builder.build(samples, 0);
                IsolationTree {
                    nodes: builder.nodes,
                    root,
                }
            })
            .collect();

        Self { trees, sample_size }
    }

    /// Anomaly score in (0, 1]; values near 1 are strong outliers
    pub fn score(&self, row: &[f64]) -> f64 {
        let mean_path = self
            .trees
            .iter()
            .map(|t| t.path_length(row))
            .sum::<f64>()
            / self.trees.len() as f64;

        let normaliser = average_path_length(self.sample_size);
        if normaliser <= 0.0 {
            return 1.0;
        }
        2f64.powf(-mean_path / normaliser)
    }
}

struct IsolationBuilder<'a> {
    rows: &'a [Vec<f64>],
    depth_limit: usize,
    rng: &'a mut StdRng,
    nodes: Vec<Node>,
}

impl IsolationBuilder<'_> {
    fn build(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        if depth >= self.depth_limit || samples.len() <= 1 {
            return self.leaf(samples.len());
        }

        // Only features that still vary inside this node can be cut
        let n_features = self.rows[samples[0]].len();
        let candidates: Vec<(usize, f64, f64)> = (0..n_features)
            .filter_map(|feature| {
                let (min, max) = samples.iter().fold(
                    (f64::INFINITY, f64::NEG_INFINITY),
                    |(lo, hi), &s| {
                        let v = self.rows[s][feature];
                        (lo.min(v), hi.max(v))
                    },
                );
                (min < max).then_some((feature, min, max))
            })
            .collect();

        if candidates.is_empty() {
            return self.leaf(samples.len());
        }

        let (feature, min, max) = candidates[self.rng.gen_range(0..candidates.len())];
        let threshold = self.rng.gen_range(min..max);

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&s| self.rows[s][feature] <= threshold);

        let left = self.build(left, depth + 1);
        let right = self.build(right, depth + 1);
        self.nodes.push(Node::Split {
            feature,
            threshold,
            left,
            right,
        });
        self.nodes.len() - 1
    }

    fn leaf(&mut self, size: usize) -> usize {
        self.nodes.push(Node::Leaf { size });
        self.nodes.len() - 1
    }
}

/// Average path length of an unsuccessful BST search over `n` items
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}
