//! Axis-aligned bounding box with integer pixel coordinates.
//!
//! Boxes are stored as corner pairs (x1, y1) top-left and (x2, y2)
//! bottom-right. Derived measures and the IoU operator live here.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when validated box construction is given bad corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The bottom-right corner is above or left of the top-left corner.
    #[error("inverted box corners: ({x1}, {y1}) to ({x2}, {y2})")]
    InvertedCorners { x1: i32, y1: i32, x2: i32, y2: i32 },
}

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    /// Top-left x coordinate
    pub x1: i32,
    /// Top-left y coordinate
    pub y1: i32,
    /// Bottom-right x coordinate
    pub x2: i32,
    /// Bottom-right y coordinate
    pub y2: i32,
}

impl BBox {
    /// Create a new BBox from corner coordinates.
    ///
    /// Corners are taken as-is; `width`/`height` go negative when the
    /// corners are inverted. Use [`BBox::try_new`] to reject such input.
    #[inline]
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a BBox, rejecting inverted corners.
    pub fn try_new(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self, GeometryError> {
        if x2 < x1 || y2 < y1 {
            return Err(GeometryError::InvertedCorners { x1, y1, x2, y2 });
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Create a BBox from the top-left corner and dimensions.
    #[inline]
    pub fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// Create a BBox from its center point and dimensions.
    ///
    /// The top-left corner is `center - size / 2` with flooring integer
    /// division, so odd sizes shift one pixel toward the origin.
    #[inline]
    pub fn from_center(center_x: i32, center_y: i32, width: i32, height: i32) -> Self {
        let x1 = center_x - width / 2;
        let y1 = center_y - height / 2;
        Self {
            x1,
            y1,
            x2: x1 + width,
            y2: y1 + height,
        }
    }

    /// Width of the bounding box.
    #[inline]
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Height of the bounding box.
    #[inline]
    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Area of the bounding box, clamped to 0 for degenerate boxes.
    #[inline]
    pub fn area(&self) -> i64 {
        self.width().max(0) as i64 * self.height().max(0) as i64
    }

    /// Center point of the bounding box (integer midpoint).
    #[inline]
    pub fn center(&self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Check whether a point lies inside the box (bounds inclusive).
    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    /// Calculate Intersection over Union (IoU) with another bounding box.
    ///
    /// Symmetric and bounded in [0, 1]. Disjoint boxes and zero-area
    /// unions both yield 0.0.
    pub fn iou(&self, other: &BBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        if x2 < x1 || y2 < y1 {
            return 0.0;
        }

        let inter_area = (x2 - x1) as i64 * (y2 - y1) as i64;
        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0 {
            inter_area as f32 / union_area as f32
        } else {
            0.0
        }
    }
}

/// Calculate IoU matrix between two sets of bounding boxes.
///
/// Returns a matrix of shape (M, N) where M is the length of `boxes_a`
/// and N is the length of `boxes_b`.
pub fn iou_batch(boxes_a: &[BBox], boxes_b: &[BBox]) -> Array2<f32> {
    let mut ious = Array2::zeros((boxes_a.len(), boxes_b.len()));
    for (i, a) in boxes_a.iter().enumerate() {
        for (j, b) in boxes_b.iter().enumerate() {
            ious[[i, j]] = a.iou(b);
        }
    }
    ious
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_measures() {
        let b = BBox::new(10, 20, 40, 60);
        assert_eq!(b.width(), 30);
        assert_eq!(b.height(), 40);
        assert_eq!(b.area(), 1200);
        assert_eq!(b.center(), (25, 40));
    }

    #[test]
    fn test_from_xywh() {
        let b = BBox::from_xywh(10, 20, 30, 40);
        assert_eq!(b, BBox::new(10, 20, 40, 60));
    }

    #[test]
    fn test_from_center_floors_odd_sizes() {
        let b = BBox::from_center(25, 40, 30, 40);
        assert_eq!(b, BBox::new(10, 20, 40, 60));

        // Odd width: 25 - 31/2 = 25 - 15 = 10
        let odd = BBox::from_center(25, 40, 31, 40);
        assert_eq!(odd.x1, 10);
        assert_eq!(odd.x2, 41);
    }

    #[test]
    fn test_try_new_rejects_inverted_corners() {
        assert!(BBox::try_new(0, 0, 10, 10).is_ok());
        assert!(matches!(
            BBox::try_new(10, 0, 0, 10),
            Err(GeometryError::InvertedCorners { .. })
        ));
    }

    #[test]
    fn test_degenerate_area_clamps_to_zero() {
        let b = BBox::new(10, 10, 5, 20);
        assert_eq!(b.area(), 0);
    }

    #[test]
    fn test_contains_point_inclusive() {
        let b = BBox::new(0, 0, 10, 10);
        assert!(b.contains_point(0, 0));
        assert!(b.contains_point(10, 10));
        assert!(b.contains_point(5, 5));
        assert!(!b.contains_point(11, 5));
        assert!(!b.contains_point(5, -1));
    }

    #[test]
    fn test_iou_same_box() {
        let a = BBox::new(0, 0, 10, 10);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_partial_overlap() {
        let a = BBox::new(0, 0, 10, 10);
        let b = BBox::new(5, 5, 15, 15);

        // Intersection: 5x5 = 25, union: 100 + 100 - 25 = 175
        let iou = a.iou(&b);
        assert!((iou - 25.0 / 175.0).abs() < 1e-6);
        assert_eq!(a.iou(&b), b.iou(&a));
    }

    #[test]
    fn test_iou_disjoint() {
        let a = BBox::new(0, 0, 10, 10);
        let b = BBox::new(20, 20, 30, 30);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_touching_edges() {
        // Shared edge has zero intersection area.
        let a = BBox::new(0, 0, 10, 10);
        let b = BBox::new(10, 0, 20, 10);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_zero_union() {
        let a = BBox::new(5, 5, 5, 5);
        assert_eq!(a.iou(&a), 0.0);
    }

    #[test]
    fn test_iou_batch_shape() {
        let a = vec![BBox::new(0, 0, 10, 10), BBox::new(20, 20, 30, 30)];
        let b = vec![BBox::new(0, 0, 10, 10)];
        let m = iou_batch(&a, &b);
        assert_eq!(m.dim(), (2, 1));
        assert!((m[[0, 0]] - 1.0).abs() < 1e-6);
        assert_eq!(m[[1, 0]], 0.0);
    }
}
