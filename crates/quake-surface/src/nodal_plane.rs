//! Fault plane orientation.

use quake_core::{QuakeError, Result};
use serde::{Deserialize, Serialize};

/// Orientation of a fault plane: strike in `[0, 360)`, dip in `(0, 90]`,
/// rake in `(-180, 180]`, all in degrees.
///
/// Strike is the azimuth of the top edge, and the plane dips to the right of
/// the strike direction (down-dip azimuth is `strike + 90`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNodalPlane")]
pub struct NodalPlane {
    strike: f64,
    dip: f64,
    rake: f64,
}

#[derive(Deserialize)]
struct RawNodalPlane {
    strike: f64,
    dip: f64,
    rake: f64,
}

impl TryFrom<RawNodalPlane> for NodalPlane {
    type Error = QuakeError;

    fn try_from(raw: RawNodalPlane) -> Result<Self> {
        NodalPlane::new(raw.strike, raw.dip, raw.rake)
    }
}

impl NodalPlane {
    pub fn new(strike: f64, dip: f64, rake: f64) -> Result<Self> {
        Self::check_strike(strike)?;
        Self::check_dip(dip)?;
        Self::check_rake(rake)?;
        Ok(Self { strike, dip, rake })
    }

    pub fn check_strike(strike: f64) -> Result<()> {
        if (0.0..360.0).contains(&strike) {
            Ok(())
        } else {
            Err(QuakeError::StrikeOutOfRange(strike))
        }
    }

    pub fn check_dip(dip: f64) -> Result<()> {
        if dip > 0.0 && dip <= 90.0 {
            Ok(())
        } else {
            Err(QuakeError::DipOutOfRange(dip))
        }
    }

    pub fn check_rake(rake: f64) -> Result<()> {
        if rake > -180.0 && rake <= 180.0 {
            Ok(())
        } else {
            Err(QuakeError::RakeOutOfRange(rake))
        }
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn dip(&self) -> f64 {
        self.dip
    }

    pub fn rake(&self) -> f64 {
        self.rake
    }
}
