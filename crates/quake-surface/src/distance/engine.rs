use quake_core::{EngineConfig, QuakeError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{kernels, DistanceMetric, PointBatch, SurfaceBatch};

/// Row-major `(surfaces, points)` matrix of distances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDistanceMatrix")]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[derive(Deserialize)]
struct RawDistanceMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<RawDistanceMatrix> for DistanceMatrix {
    type Error = QuakeError;

    fn try_from(raw: RawDistanceMatrix) -> Result<Self> {
        if raw.rows.checked_mul(raw.cols) != Some(raw.data.len()) {
            return Err(QuakeError::InvalidOperation(format!(
                "distance matrix of shape ({}, {}) cannot hold {} values",
                raw.rows,
                raw.cols,
                raw.data.len()
            )));
        }
        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            data: raw.data,
        })
    }
}

impl DistanceMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Resize to `(rows, cols)`, keeping the allocation where possible.
    pub fn reshape(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.data.clear();
        self.data.resize(rows * cols, 0.0);
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, u: usize, n: usize) -> f64 {
        self.data[u * self.cols + n]
    }

    pub fn row(&self, u: usize) -> &[f64] {
        &self.data[u * self.cols..(u + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

/// Evaluates one distance metric for every (surface, point) pair.
///
/// Rows are independent, so with `parallel` set they are filled concurrently
/// with rayon. Sequential and parallel evaluation give identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceEngine {
    parallel: bool,
}

impl Default for DistanceEngine {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl DistanceEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            parallel: config.parallel,
        }
    }

    pub fn sequential() -> Self {
        Self { parallel: false }
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn compute(
        &self,
        metric: DistanceMetric,
        surfaces: &SurfaceBatch,
        points: &PointBatch,
    ) -> Result<DistanceMatrix> {
        let mut out = DistanceMatrix::default();
        self.compute_into(metric, surfaces, points, &mut out)?;
        Ok(out)
    }

    /// Like [`Self::compute`] with the metric given by its key (`"rjb"`, ...).
    pub fn compute_by_key(
        &self,
        key: &str,
        surfaces: &SurfaceBatch,
        points: &PointBatch,
    ) -> Result<DistanceMatrix> {
        self.compute(key.parse()?, surfaces, points)
    }

    /// Evaluate into an existing matrix, reusing its buffer.
    pub fn compute_into(
        &self,
        metric: DistanceMetric,
        surfaces: &SurfaceBatch,
        points: &PointBatch,
        out: &mut DistanceMatrix,
    ) -> Result<()> {
        let (rows, cols) = (surfaces.len(), points.len());
        trace!(surfaces = rows, points = cols, %metric, "computing distances");

        if metric.needs_hypocentre() {
            if let Some(u) = surfaces.first_missing_hypocentre() {
                return Err(QuakeError::InvalidOperation(format!(
                    "{metric} needs a hypocentre, surface {u} has none"
                )));
            }
        }

        out.reshape(rows, cols);
        if rows == 0 || cols == 0 {
            return Ok(());
        }

        let fill = |(u, row): (usize, &mut [f64])| {
            kernels::evaluate(metric, &surfaces.row(u), points, row)
        };
        if self.parallel {
            out.data.par_chunks_mut(cols).enumerate().for_each(fill);
        } else {
            out.data.chunks_mut(cols).enumerate().for_each(fill);
        }
        Ok(())
    }
}
