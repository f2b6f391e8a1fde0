//! Scales: mappings between data space and screen space.

use crate::data::Column;
use crate::error::{PlotError, PlotResult};
use std::collections::HashMap;

pub trait Scale {
    fn compute(&self, x: f64) -> f64;

    fn v_compute(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.compute(x)).collect()
    }

    fn invert(&self, sx: f64) -> f64;

    fn v_invert(&self, sxs: &[f64]) -> Vec<f64> {
        sxs.iter().map(|&sx| self.invert(sx)).collect()
    }

    /// Invert a screen range; the result is ordered low to high
    fn r_invert(&self, s0: f64, s1: f64) -> (f64, f64) {
        let (a, b) = (self.invert(s0), self.invert(s1));
        (a.min(b), a.max(b))
    }

    /// Synthetic (numeric) coordinates for a resolved coordinate column
    fn v_synthetic(&self, column: &Column) -> PlotResult<Vec<f64>> {
        column.to_numbers("coordinate")
    }
}

/// Affine map from `source` range onto `target` range
#[derive(Clone, Debug, PartialEq)]
pub struct LinearScale {
    pub source: (f64, f64),
    pub target: (f64, f64),
}

impl LinearScale {
    pub fn new(source: (f64, f64), target: (f64, f64)) -> Self {
        Self { source, target }
    }

    fn coefficients(&self) -> (f64, f64) {
        let (s0, s1) = self.source;
        let (t0, t1) = self.target;
        let span = s1 - s0;
        if span == 0.0 {
            return (0.0, t0);
        }
        let factor = (t1 - t0) / span;
        (factor, t0 - factor * s0)
    }
}

impl Scale for LinearScale {
    fn compute(&self, x: f64) -> f64 {
        let (factor, offset) = self.coefficients();
        factor * x + offset
    }

    fn invert(&self, sx: f64) -> f64 {
        let (factor, offset) = self.coefficients();
        if factor == 0.0 {
            self.source.0
        } else {
            (sx - offset) / factor
        }
    }
}

/// Categorical axis: factor `i` sits at synthetic coordinate `i + 0.5`.
#[derive(Clone, Debug)]
pub struct CategoricalScale {
    factors: Vec<String>,
    positions: HashMap<String, usize>,
    linear: LinearScale,
}

impl CategoricalScale {
    /// Factors span the source range `[0, factors.len()]`
    pub fn new(factors: Vec<String>, target: (f64, f64)) -> Self {
        let positions = factors
            .iter()
            .enumerate()
            .map(|(i, f)| (f.clone(), i))
            .collect();
        let linear = LinearScale::new((0.0, factors.len() as f64), target);
        Self {
            factors,
            positions,
            linear,
        }
    }

    pub fn factors(&self) -> &[String] {
        &self.factors
    }

    /// Synthetic coordinate of one factor; NaN when unknown
    pub fn synthetic(&self, factor: &str) -> f64 {
        self.positions
            .get(factor)
            .map(|&i| i as f64 + 0.5)
            .unwrap_or(f64::NAN)
    }
}

impl Scale for CategoricalScale {
    fn compute(&self, x: f64) -> f64 {
        self.linear.compute(x)
    }

    fn invert(&self, sx: f64) -> f64 {
        self.linear.invert(sx)
    }

    fn v_synthetic(&self, column: &Column) -> PlotResult<Vec<f64>> {
        match column {
            Column::Strings(factors) => Ok(factors.iter().map(|f| self.synthetic(f)).collect()),
            Column::Numbers(values) => Ok(values.clone()),
            other => Err(PlotError::ColumnType {
                attr: other.type_name().to_string(),
                expected: "factors",
            }),
        }
    }
}
