//! Crop Classification
//!
//! Wraps the pre-trained scaler + tree-ensemble artifact produced by the
//! offline training job. The crate never trains anything: it loads the
//! artifact once at startup, validates its invariants, and answers
//! `predict` calls with the top-3 crops by averaged leaf-vote probability.
//!
//! Artifact layout (`crop_model.json`):
//! - `classes`: crop labels in the trained class order
//! - `scaler`: per-feature mean/scale of the standardization transform
//! - `trees`: node arrays; `split` nodes descend left when
//!   `x[feature] <= threshold`, `leaf` nodes carry a per-class vote
//!   distribution

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// The 7 input features, in wire order: N, P, K, temperature, humidity,
/// ph, rainfall.
pub const FEATURE_COUNT: usize = 7;

/// Every prediction response carries exactly this many recommendations.
pub const TOP_K: usize = 3;

/// One ranked crop recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub crop: String,
    /// Classifier-reported class probability in [0, 1].
    pub confidence: f64,
}

/// Fitted standardization transform: `(x - mean) / scale` per feature.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl FeatureScaler {
    fn transform(&self, features: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut scaled = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            scaled[i] = (features[i] - self.mean[i]) / self.scale[i];
        }
        scaled
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        votes: Vec<f64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk from the root to a leaf and return its vote distribution.
    ///
    /// Load-time validation guarantees child indices point forward, so the
    /// walk always terminates.
    fn leaf_votes(&self, scaled: &[f64; FEATURE_COUNT]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if scaled[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { votes } => return votes,
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    classes: Vec<String>,
    scaler: FeatureScaler,
    trees: Vec<DecisionTree>,
}

/// Pre-trained multi-class crop classifier.
#[derive(Debug)]
pub struct CropClassifier {
    classes: Vec<String>,
    scaler: FeatureScaler,
    trees: Vec<DecisionTree>,
}

impl CropClassifier {
    /// Load and validate the model artifact.
    ///
    /// Any structural violation is fatal: the service must not start with a
    /// model it cannot trust to answer every request.
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Model artifact unavailable: {}", path))?;
        Self::from_json(&contents).with_context(|| format!("Invalid model artifact: {}", path))
    }

    /// Parse and validate an artifact from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: ModelArtifact =
            serde_json::from_str(json).context("Failed to parse model artifact")?;
        Self::validate(&artifact)?;
        Ok(Self {
            classes: artifact.classes,
            scaler: artifact.scaler,
            trees: artifact.trees,
        })
    }

    fn validate(artifact: &ModelArtifact) -> Result<()> {
        let n_classes = artifact.classes.len();
        if n_classes < TOP_K {
            bail!("Model has {} classes, need at least {}", n_classes, TOP_K);
        }
        if artifact.scaler.mean.len() != FEATURE_COUNT
            || artifact.scaler.scale.len() != FEATURE_COUNT
        {
            bail!(
                "Scaler must cover {} features (got mean: {}, scale: {})",
                FEATURE_COUNT,
                artifact.scaler.mean.len(),
                artifact.scaler.scale.len()
            );
        }
        for (i, s) in artifact.scaler.scale.iter().enumerate() {
            if *s == 0.0 || !s.is_finite() {
                bail!("Scaler has unusable scale {} for feature {}", s, i);
            }
        }
        if artifact.trees.is_empty() {
            bail!("Model has no trees");
        }
        for (t, tree) in artifact.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                bail!("Tree {} is empty", t);
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= FEATURE_COUNT {
                            bail!("Tree {} node {} splits on unknown feature {}", t, i, feature);
                        }
                        if !threshold.is_finite() {
                            bail!("Tree {} node {} has non-finite threshold", t, i);
                        }
                        // Children must point forward so every walk terminates.
                        for child in [left, right] {
                            if *child <= i || *child >= tree.nodes.len() {
                                bail!("Tree {} node {} has invalid child index {}", t, i, child);
                            }
                        }
                    }
                    TreeNode::Leaf { votes } => {
                        if votes.len() != n_classes {
                            bail!(
                                "Tree {} node {} has {} votes for {} classes",
                                t,
                                i,
                                votes.len(),
                                n_classes
                            );
                        }
                        if votes.iter().any(|v| !v.is_finite() || *v < 0.0) {
                            bail!("Tree {} node {} has invalid vote weights", t, i);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Crop labels in class order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Rank crops for a raw feature vector.
    ///
    /// Scales the input, averages leaf-vote distributions across trees, and
    /// returns the top 3 crops sorted by descending probability; equal
    /// probabilities keep the lower class index (stable sort).
    pub fn predict(
        &self,
        features: &[f64; FEATURE_COUNT],
    ) -> Result<Vec<Recommendation>, InferenceError> {
        let scaled = self.scaler.transform(features);
        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(InferenceError(
                "scaled feature vector is not finite".to_string(),
            ));
        }

        let mut probabilities = vec![0.0f64; self.classes.len()];
        for tree in &self.trees {
            for (p, v) in probabilities.iter_mut().zip(tree.leaf_votes(&scaled)) {
                *p += v;
            }
        }
        let n_trees = self.trees.len() as f64;
        for p in probabilities.iter_mut() {
            *p /= n_trees;
        }
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(InferenceError(
                "class probabilities are not finite".to_string(),
            ));
        }

        let mut order: Vec<usize> = (0..self.classes.len()).collect();
        order.sort_by(|&a, &b| probabilities[b].total_cmp(&probabilities[a]));

        Ok(order
            .into_iter()
            .take(TOP_K)
            .map(|idx| Recommendation {
                crop: self.classes[idx].clone(),
                confidence: probabilities[idx],
            })
            .collect())
    }
}
