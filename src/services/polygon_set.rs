// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Polygon set algebra over multi-polygons with holes.
//!
//! The clipping itself is delegated to a [`PolygonClipper`]. The default
//! [`GeoClipper`] uses the boolean operations from the `geo` crate; any
//! failure inside the library, including a panic, is reported as
//! [`EngineError::GeometryOperation`] naming the operation.

use geo::{BooleanOps, MultiPolygon, Polygon};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{EngineError, Result};

/// Pluggable 2D polygon clipping.
pub trait PolygonClipper: Send + Sync {
    /// Geometric union of `a` and `b`.
    fn union(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>>;

    /// `a` minus `b`. `None` means nothing is left.
    fn difference(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<Option<MultiPolygon<f64>>>;

    /// Fold `parts` with [`union`](Self::union), pairwise from left to right.
    fn union_all(&self, parts: Vec<MultiPolygon<f64>>) -> Result<MultiPolygon<f64>> {
        parts
            .into_iter()
            .try_fold(MultiPolygon::new(vec![]), |acc, part| self.union(&acc, &part))
    }
}

/// Clipper backed by `geo::BooleanOps`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoClipper;

impl PolygonClipper for GeoClipper {
    fn union(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        let a = without_degenerate(a);
        let b = without_degenerate(b);
        if a.0.is_empty() {
            return Ok(b);
        }
        if b.0.is_empty() {
            return Ok(a);
        }

        let merged = guarded("union", || a.union(&b))?;
        Ok(without_degenerate(&merged))
    }

    fn difference(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<Option<MultiPolygon<f64>>> {
        let a = without_degenerate(a);
        let b = without_degenerate(b);
        if a.0.is_empty() {
            return Ok(None);
        }
        if b.0.is_empty() {
            return Ok(Some(a));
        }

        let remaining = without_degenerate(&guarded("difference", || a.difference(&b))?);
        Ok((!remaining.0.is_empty()).then_some(remaining))
    }
}

/// Drop polygons whose outer ring cannot enclose area, and holes likewise.
pub fn without_degenerate(polygons: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    polygons
        .iter()
        .filter(|p| p.exterior().0.len() >= 4)
        .map(|p| {
            let holes = p
                .interiors()
                .iter()
                .filter(|h| h.0.len() >= 4)
                .cloned()
                .collect();
            Polygon::new(p.exterior().clone(), holes)
        })
        .collect()
}

fn guarded<F>(operation: &'static str, op: F) -> Result<MultiPolygon<f64>>
where
    F: FnOnce() -> MultiPolygon<f64>,
{
    let result = panic::catch_unwind(AssertUnwindSafe(op))
        .map_err(|payload| geometry_error(operation, panic_detail(payload.as_ref())))?;

    let finite = result
        .iter()
        .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
        .flat_map(|ring| ring.0.iter())
        .all(|c| c.x.is_finite() && c.y.is_finite());
    if !finite {
        return Err(geometry_error(
            operation,
            "result contains non-finite coordinates".to_string(),
        ));
    }

    Ok(result)
}

fn geometry_error(operation: &'static str, detail: String) -> EngineError {
    tracing::warn!(operation, detail = %detail, "Polygon clipping failed");
    EngineError::GeometryOperation { operation, detail }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "clipping library panicked".to_string()
    }
}
