use nalgebra as na;
use na::{Matrix4, Matrix4xX, Point3};

use crate::error::{RenderError, Result};

/// Smallest capacity a point matrix grows to.
const MIN_COLUMNS: usize = 4;

/// Growable 4 x N matrix of homogeneous points, one point per column.
///
/// Rows 0..=2 hold x, y, z and row 3 the homogeneous weight, which is always 1
/// for stored points. Only the first `len` columns are meaningful, the rest is
/// spare capacity kept around so the same matrix can be reused for every
/// drawable operation of a render pass.
#[derive(Debug, Clone)]
pub struct PointMatrix {
    data: Matrix4xX<f64>,
    len: usize,
    limit: usize, // Hard ceiling on capacity.
}

impl PointMatrix {
    /// Empty matrix with room for `capacity` points, never growing past `limit`.
    pub fn new(capacity: usize, limit: usize) -> Self {
        let capacity = capacity.min(limit);
        return Self {
            data: Matrix4xX::zeros(capacity),
            len: 0,
            limit,
        };
    }

    /// Number of valid columns.
    pub fn len(&self) -> usize {
        return self.len;
    }

    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    /// Number of allocated columns.
    pub fn capacity(&self) -> usize {
        return self.data.ncols();
    }

    /// Most columns the matrix may ever hold.
    pub fn limit(&self) -> usize {
        return self.limit;
    }

    /// Appends a point, growing the storage when it is full.
    pub fn push_point(&mut self, p: Point3<f64>) -> Result<()> {
        if self.len == self.capacity() {
            self.grow(self.len + 1)?;
        }
        let mut column = self.data.column_mut(self.len);
        column[0] = p.x;
        column[1] = p.y;
        column[2] = p.z;
        column[3] = 1.0;
        self.len += 1;
        return Ok(());
    }

    /// Makes sure `additional` more points fit without another reallocation.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let requested = self.len.checked_add(additional).ok_or(RenderError::BufferCapacityExceeded {
            requested: usize::MAX,
            limit: self.limit,
        })?;
        if requested > self.capacity() {
            self.grow(requested)?;
        }
        return Ok(());
    }

    /// Point stored in column `i`, projected out of homogeneous coordinates.
    pub fn point(&self, i: usize) -> Point3<f64> {
        assert!(i < self.len, "column {} out of {} valid columns", i, self.len);
        let column = self.data.column(i);
        return Point3::new(column[0], column[1], column[2]);
    }

    /// Iterates over the valid points in column order.
    pub fn points(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        return (0..self.len).map(move |i| self.point(i));
    }

    /// Replaces every valid column `p` by `frame * p`.
    pub fn transform(&mut self, frame: &Matrix4<f64>) {
        if self.len == 0 {
            return;
        }
        let transformed = frame * self.data.columns(0, self.len);
        self.data.columns_mut(0, self.len).copy_from(&transformed);
    }

    /// Forgets all points but keeps the allocation.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Doubles the capacity until `needed` columns fit, bounded by the limit.
    fn grow(&mut self, needed: usize) -> Result<()> {
        if needed > self.limit {
            return Err(RenderError::BufferCapacityExceeded {
                requested: needed,
                limit: self.limit,
            });
        }
        let doubled = self.capacity().saturating_mul(2).max(MIN_COLUMNS);
        let new_capacity = doubled.max(needed).min(self.limit);
        log::trace!("growing point matrix {} -> {} columns", self.capacity(), new_capacity);
        self.data.resize_horizontally_mut(new_capacity, 0.0);
        return Ok(());
    }
}
