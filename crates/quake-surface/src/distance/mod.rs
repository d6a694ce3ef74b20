//! Site-to-rupture distance metrics over batches of surfaces and points.

mod batch;
mod engine;
pub(crate) mod kernels;
mod points;

use std::fmt;
use std::str::FromStr;

use quake_core::QuakeError;
use serde::{Deserialize, Serialize};

pub use batch::SurfaceBatch;
pub use engine::{DistanceEngine, DistanceMatrix};
pub use kernels::SurfaceRow;
pub use points::PointBatch;

/// The distance metrics a rupture surface can report for a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Closest distance to the rupture plane (Rrup).
    Min,
    /// Joyner-Boore distance to the surface projection.
    Rjb,
    /// Signed distance to the top edge's strike line, positive on the hanging wall.
    Rx,
    /// Distance beyond the rupture's ends, measured along strike.
    Ry0,
    Rhypo,
    Repi,
    /// Azimuth from the hypocentre to the site, relative to strike.
    Azimuth,
}

impl DistanceMetric {
    pub const ALL: [DistanceMetric; 7] = [
        DistanceMetric::Min,
        DistanceMetric::Rjb,
        DistanceMetric::Rx,
        DistanceMetric::Ry0,
        DistanceMetric::Rhypo,
        DistanceMetric::Repi,
        DistanceMetric::Azimuth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DistanceMetric::Min => "min",
            DistanceMetric::Rjb => "rjb",
            DistanceMetric::Rx => "rx",
            DistanceMetric::Ry0 => "ry0",
            DistanceMetric::Rhypo => "rhypo",
            DistanceMetric::Repi => "repi",
            DistanceMetric::Azimuth => "azimuth",
        }
    }

    /// Whether the metric is measured from the hypocentre.
    pub fn needs_hypocentre(self) -> bool {
        matches!(
            self,
            DistanceMetric::Rhypo | DistanceMetric::Repi | DistanceMetric::Azimuth
        )
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = QuakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DistanceMetric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| QuakeError::Parse(format!("unknown distance metric '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        for m in DistanceMetric::ALL {
            assert_eq!(m.to_string().parse::<DistanceMetric>().unwrap(), m);
        }
        assert_eq!("ry0".parse::<DistanceMetric>().unwrap(), DistanceMetric::Ry0);
    }

    #[test]
    fn test_unknown_key() {
        let err = "rrup".parse::<DistanceMetric>().unwrap_err();
        assert_eq!(err.to_string(), "Parse error: unknown distance metric 'rrup'");
    }

    #[test]
    fn test_hypocentre_metrics() {
        let needing: Vec<_> = DistanceMetric::ALL
            .into_iter()
            .filter(|m| m.needs_hypocentre())
            .collect();
        assert_eq!(
            needing,
            vec![DistanceMetric::Rhypo, DistanceMetric::Repi, DistanceMetric::Azimuth]
        );
    }
}
