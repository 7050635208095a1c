use anyhow::{Context, Result};
use linfa::prelude::*;
use linfa_trees::DecisionTree;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::models::VitalSigns;

/// Adapter around the pre-trained risk classifier.
///
/// The model artifact is deserialized once at startup and shared read-only
/// for the process lifetime; a missing or malformed artifact is a startup
/// error, never a request error.
#[derive(Debug, Clone)]
pub struct RiskModelService {
    model: DecisionTree<f64, usize>,
}

impl RiskModelService {
    /// Load the serialized decision tree from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open model artifact {}", path.display()))?;
        let model: DecisionTree<f64, usize> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to deserialize model artifact {}", path.display()))?;

        Ok(Self { model })
    }

    /// Wrap an already-constructed model.
    pub fn from_model(model: DecisionTree<f64, usize>) -> Self {
        Self { model }
    }

    /// Classify one six-feature measurement row; returns the raw class.
    pub fn predict(&self, vitals: &VitalSigns) -> usize {
        let records = vitals.to_feature_row();
        let classes = self.model.predict(&records);
        classes[0]
    }
}
