use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every transform the catalog knows, in catalog order.
///
/// Display names are the public operation keys accepted by
/// [`TransformRegistry::execute`](super::TransformRegistry::execute).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "Test Loop")]
    TestLoop,
    #[serde(rename = "Canny Edge Detection")]
    CannyEdgeDetection,
    #[serde(rename = "Optical Flow")]
    OpticalFlow,
    #[serde(rename = "Contour And Shape")]
    ContourAndShape,
    #[serde(rename = "K-Means")]
    KMeans,
    #[serde(rename = "Gaussian Blur")]
    GaussianBlur,
    #[serde(rename = "Median Blur")]
    MedianBlur,
    #[serde(rename = "Histogram")]
    Histogram,
    #[serde(rename = "ORB Features")]
    OrbFeatures,
    #[serde(rename = "Detect Circles")]
    DetectCircles,
    #[serde(rename = "DFT")]
    Dft,
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::TestLoop,
        Operation::CannyEdgeDetection,
        Operation::OpticalFlow,
        Operation::ContourAndShape,
        Operation::KMeans,
        Operation::GaussianBlur,
        Operation::MedianBlur,
        Operation::Histogram,
        Operation::OrbFeatures,
        Operation::DetectCircles,
        Operation::Dft,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Operation::TestLoop => "Test Loop",
            Operation::CannyEdgeDetection => "Canny Edge Detection",
            Operation::OpticalFlow => "Optical Flow",
            Operation::ContourAndShape => "Contour And Shape",
            Operation::KMeans => "K-Means",
            Operation::GaussianBlur => "Gaussian Blur",
            Operation::MedianBlur => "Median Blur",
            Operation::Histogram => "Histogram",
            Operation::OrbFeatures => "ORB Features",
            Operation::DetectCircles => "Detect Circles",
            Operation::Dft => "DFT",
        }
    }

    /// Registered unless explicitly opted into.
    pub const fn enabled_by_default(self) -> bool {
        !matches!(
            self,
            Operation::TestLoop | Operation::OpticalFlow | Operation::Histogram | Operation::Dft
        )
    }

    /// Exact, case-sensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| CatalogError::UnknownOperation(s.to_string()))
    }
}
