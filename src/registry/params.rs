use super::operation::Operation;
use crate::contours::ContourParams;
use crate::edges::CannyParams;
use crate::features::OrbParams;
use crate::filters::{GaussianParams, MedianParams};
use crate::flow::FlowParams;
use crate::hough::HoughParams;
use crate::segment::KMeansParams;
use serde::{Deserialize, Serialize};

/// Parameters of every kernel. Missing JSON fields keep their defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelParams {
    pub canny: CannyParams,
    pub gaussian: GaussianParams,
    pub median: MedianParams,
    pub kmeans: KMeansParams,
    pub contours: ContourParams,
    pub orb: OrbParams,
    pub hough: HoughParams,
    pub flow: FlowParams,
}

/// Which operations a registry exposes and how its kernels are tuned.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Operations that are off by default and should be registered too.
    pub enable: Vec<Operation>,
    pub params: KernelParams,
}

impl RegistryConfig {
    /// Default set plus every optional operation.
    pub fn all_operations() -> Self {
        Self {
            enable: Operation::ALL.to_vec(),
            ..Default::default()
        }
    }

    pub fn with_enabled(mut self, op: Operation) -> Self {
        if !self.enable.contains(&op) {
            self.enable.push(op);
        }
        self
    }

    /// Enabled operations in catalog order.
    pub fn enabled_operations(&self) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|op| op.enabled_by_default() || self.enable.contains(op))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_list_keeps_catalog_order() {
        let config = RegistryConfig::default()
            .with_enabled(Operation::Dft)
            .with_enabled(Operation::TestLoop);
        let ops = config.enabled_operations();
        assert_eq!(ops.first(), Some(&Operation::TestLoop));
        assert_eq!(ops.last(), Some(&Operation::Dft));
        assert_eq!(ops.len(), 9);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "enable": ["DFT"], "params": { "canny": { "low_threshold": 50.0 } } }"#;
        let config: RegistryConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.enable, vec![Operation::Dft]);
        assert_eq!(config.params.canny.low_threshold, 50.0);
        assert_eq!(config.params.canny.high_threshold, 200.0);
        assert_eq!(config.params.gaussian.ksize, 15);
        assert_eq!(config.params.kmeans.k, 3);
    }
}
