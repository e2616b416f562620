//! Random forest classifier
//!
//! Each tree is grown on a bootstrap sample of the training rows. At every
//! node a random subset of features (sqrt of the feature count) is searched
//! for the split with the lowest weighted Gini impurity, with thresholds
//! placed halfway between adjacent distinct values. Trees grow until their
//! leaves are pure, cannot be split, or reach `max_depth`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Random forest hyperparameters
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    /// Number of trees in the ensemble
    pub trees: usize,
    /// RNG seed for bootstrap and feature sampling
    pub seed: u64,
    /// Optional depth limit (None = grow until pure)
    pub max_depth: Option<usize>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            trees: 100,
            seed: 42,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<Node>,
    root: usize,
}

impl DecisionTree {
    fn distribution(&self, row: &[f64]) -> &[f64] {
        let mut idx = self.root;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
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
                }
            }
        }
    }
}

/// A fitted random forest over dense `f64` rows and integer class labels
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    /// Fit a forest. `labels[i]` must be `< n_classes` and `params.trees` at least 1.
    pub fn fit(
        rows: &[Vec<f64>],
        labels: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Self {
        debug_assert_eq!(rows.len(), labels.len());

        let mut rng = StdRng::seed_from_u64(params.seed);
        let n_features = rows.first().map_or(0, Vec::len);
        let max_features = ((n_features as f64).sqrt() as usize).max(1);
        let n = rows.len();

        let trees = (0..params.trees)
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let mut builder = TreeBuilder {
                    rows,
                    labels,
                    n_classes,
                    n_features,
                    max_features,
                    max_depth: params.max_depth,
                    rng: &mut rng,
                    nodes: Vec::new(),
                };
                let root = builder.build(bootstrap, 0);
                DecisionTree {
                    nodes: builder.nodes,
                    root,
                }
            })
            .collect();

        Self { trees, n_classes }
    }

    /// Mean of per-tree class distributions
    pub fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.distribution(row)) {
                *acc += p;
            }
        }
        let count = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= count);
        proba
    }

    /// Most likely class; ties resolve to the lowest class index
    pub fn predict(&self, row: &[f64]) -> usize {
        let proba = self.predict_proba(row);
        let mut best = 0;
        for (class, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = class;
            }
        }
        best
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

struct TreeBuilder<'a> {
    rows: &'a [Vec<f64>],
    labels: &'a [usize],
    n_classes: usize,
    n_features: usize,
    max_features: usize,
    max_depth: Option<usize>,
    rng: &'a mut StdRng,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    /// Grow a subtree over `samples` and return its node index
    fn build(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let counts = self.class_counts(&samples);
        let is_pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let depth_reached = self.max_depth.is_some_and(|max| depth >= max);

        if is_pure || samples.len() < 2 || depth_reached {
            return self.leaf(&counts, samples.len());
        }

        let Some((feature, threshold)) = self.best_split(&samples) else {
            return self.leaf(&counts, samples.len());
        };

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

    fn leaf(&mut self, counts: &[usize], total: usize) -> usize {
        let total = total.max(1) as f64;
        let distribution = counts.iter().map(|&c| c as f64 / total).collect();
        self.nodes.push(Node::Leaf { distribution });
        self.nodes.len() - 1
    }

    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &s in samples {
            counts[self.labels[s]] += 1;
        }
        counts
    }

    /// Search a random feature subset for the lowest-impurity split.
    /// Keeps drawing features past `max_features` until one yields a split.
    fn best_split(&mut self, samples: &[usize]) -> Option<(usize, f64)> {
        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(&mut *self.rng);

        let mut best: Option<(f64, usize, f64)> = None;
        for (visited, &feature) in features.iter().enumerate() {
            if visited >= self.max_features && best.is_some() {
                break;
            }
            if let Some((impurity, threshold)) = self.best_threshold(samples, feature) {
                if best.map_or(true, |(b, _, _)| impurity < b) {
                    best = Some((impurity, feature, threshold));
                }
            }
        }

        best.map(|(_, feature, threshold)| (feature, threshold))
    }

    /// Best threshold on one feature as (weighted gini, threshold)
    fn best_threshold(&self, samples: &[usize], feature: usize) -> Option<(f64, f64)> {
        let mut sorted: Vec<(f64, usize)> = samples
            .iter()
            .map(|&s| (self.rows[s][feature], self.labels[s]))
            .collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = sorted.len();
        let mut left = vec![0usize; self.n_classes];
        let mut right = vec![0usize; self.n_classes];
        for &(_, label) in &sorted {
            right[label] += 1;
        }

        let mut best: Option<(f64, f64)> = None;
        for i in 0..n - 1 {
            let (value, label) = sorted[i];
            left[label] += 1;
            right[label] -= 1;

            let next = sorted[i + 1].0;
            if value >= next {
                continue;
            }

            let n_left = i + 1;
            let n_right = n - n_left;
            let impurity = (n_left as f64 * gini(&left, n_left)
                + n_right as f64 * gini(&right, n_right))
                / n as f64;

            if best.map_or(true, |(b, _)| impurity < b) {
                let mut threshold = (value + next) / 2.0;
                if threshold >= next {
                    threshold = value;
                }
                best = Some((impurity, threshold));
            }
        }

        best
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            rows.push(vec![i as f64, 5.0]);
            labels.push(0);
            rows.push(vec![100.0 + i as f64, 5.0]);
            labels.push(1);
        }
        (rows, labels)
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[4, 0], 4), 0.0);
        assert_eq!(gini(&[2, 2], 4), 0.5);
        assert_eq!(gini(&[], 0), 0.0);
    }

    #[test]
    fn test_forest_separates_classes() {
        let (rows, labels) = separable();
        let forest = RandomForest::fit(&rows, &labels, 2, &ForestParams::default());

        assert_eq!(forest.n_trees(), 100);
        assert_eq!(forest.predict(&[3.0, 5.0]), 0);
        assert_eq!(forest.predict(&[110.0, 5.0]), 1);

        let proba = forest.predict_proba(&[110.0, 5.0]);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_forest_is_deterministic() {
        let (rows, labels) = separable();
        let params = ForestParams {
            trees: 10,
            ..Default::default()
        };
        let a = RandomForest::fit(&rows, &labels, 2, &params);
        let b = RandomForest::fit(&rows, &labels, 2, &params);
        for probe in [0.0, 50.0, 60.0, 99.5, 140.0] {
            assert_eq!(
                a.predict_proba(&[probe, 5.0]),
                b.predict_proba(&[probe, 5.0])
            );
        }
    }

    #[test]
    fn test_constant_features_yield_leaf() {
        let rows = vec![vec![1.0, 1.0]; 6];
        let labels = vec![0, 1, 0, 1, 0, 1];
        let forest = RandomForest::fit(
            &rows,
            &labels,
            2,
            &ForestParams {
                trees: 3,
                ..Default::default()
            },
        );
        let proba = forest.predict_proba(&[1.0, 1.0]);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let (rows, labels) = separable();
        let forest = RandomForest::fit(
            &rows,
            &labels,
            2,
            &ForestParams {
                trees: 5,
                seed: 7,
                max_depth: Some(0),
            },
        );
        // Depth 0 forces every tree to a single leaf
        assert!(forest.trees.iter().all(|t| t.nodes.len() == 1));
    }
}
