//! Releasable-domain detection records: the normalized, public-distribution
//! coordinate convention. All box edges live in `[0, 1]` relative to the
//! frame the detector ran on; renderers rescale them to pixel space with
//! [`FrameDetections::scale`] before drawing.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

use crate::raw::{HandSide, HandState};

/// An axis-aligned box with normalized `left/top/right/bottom` edges.
///
/// Invariants (checked by [`crate::check::DetectionChecker`], not at
/// construction): every edge in `[0, 1]`, `left <= right`, `top <= bottom`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl NormalizedBBox {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn center_int(&self) -> (i32, i32) {
        let (x, y) = self.center();
        (
            x.round_ties_even() as i32,
            y.round_ties_even() as i32,
        )
    }

    pub fn top_left(&self) -> (f32, f32) {
        (self.left, self.top)
    }

    pub fn top_left_int(&self) -> (i32, i32) {
        (
            self.left.round_ties_even() as i32,
            self.top.round_ties_even() as i32,
        )
    }

    pub fn bottom_right(&self) -> (f32, f32) {
        (self.right, self.bottom)
    }

    pub fn coords(&self) -> ((f32, f32), (f32, f32)) {
        (self.top_left(), self.bottom_right())
    }

    pub fn coords_int(&self) -> ((i32, i32), (i32, i32)) {
        let ((left, top), (right, bottom)) = self.coords();
        (
            (
                left.round_ties_even() as i32,
                top.round_ties_even() as i32,
            ),
            (
                right.round_ties_even() as i32,
                bottom.round_ties_even() as i32,
            ),
        )
    }

    /// Multiply the horizontal edges by `width_factor` and the vertical
    /// edges by `height_factor` in place.
    pub fn scale(&mut self, width_factor: f32, height_factor: f32) {
        self.left *= width_factor;
        self.right *= width_factor;
        self.top *= height_factor;
        self.bottom *= height_factor;
    }

    /// Grow or shrink the box about its center, keeping the center fixed.
    pub fn center_scale(&mut self, width_factor: f32, height_factor: f32) {
        let (center_x, center_y) = self.center();
        let half_width = self.width() / 2.0 * width_factor;
        let half_height = self.height() / 2.0 * height_factor;
        self.left = center_x - half_width;
        self.right = center_x + half_width;
        self.top = center_y - half_height;
        self.bottom = center_y + half_height;
    }
}

/// An absolute displacement in normalized coordinates; components lie in
/// `[-1, 1]`. This is the releasable form of the raw
/// [`crate::geometry::OffsetVector`]: direction and magnitude premultiplied
/// and divided by the frame dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatVector {
    pub x: f32,
    pub y: f32,
}

impl FloatVector {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn coord(self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn scale(&mut self, width_factor: f32, height_factor: f32) {
        self.x *= width_factor;
        self.y *= height_factor;
    }
}

impl Add for FloatVector {
    type Output = FloatVector;

    fn add(self, other: FloatVector) -> FloatVector {
        FloatVector::new(self.x + other.x, self.y + other.y)
    }
}

impl Mul<f32> for FloatVector {
    type Output = FloatVector;

    fn mul(self, scaler: f32) -> FloatVector {
        FloatVector::new(self.x * scaler, self.y * scaler)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandDetection {
    pub bbox: NormalizedBBox,
    pub score: f32,
    pub state: HandState,
    pub object_offset: FloatVector,
    pub side: HandSide,
}

impl HandDetection {
    pub fn scale(&mut self, width_factor: f32, height_factor: f32) {
        self.bbox.scale(width_factor, height_factor);
        self.object_offset.scale(width_factor, height_factor);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectDetection {
    pub bbox: NormalizedBBox,
    pub score: f32,
}

impl ObjectDetection {
    pub fn scale(&mut self, width_factor: f32, height_factor: f32) {
        self.bbox.scale(width_factor, height_factor);
    }
}

/// Releasable per-frame record. Same aggregate shape as the raw
/// [`crate::raw::FrameDetections`], different coordinate convention.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameDetections {
    pub video_id: String,
    pub frame_number: u32,
    pub objects: Vec<ObjectDetection>,
    pub hands: Vec<HandDetection>,
}

impl FrameDetections {
    pub fn filter_above_threshold(
        &mut self,
        object_threshold: Option<f32>,
        hand_threshold: Option<f32>,
    ) {
        if let Some(threshold) = object_threshold {
            self.objects.retain(|object| object.score >= threshold);
        }
        if let Some(threshold) = hand_threshold {
            self.hands.retain(|hand| hand.score >= threshold);
        }
    }

    /// `(hand_index, object_index)` pairs for every in-contact hand at or
    /// above `hand_threshold`, matched to the candidate object (at or above
    /// `object_threshold`) whose center is nearest the hand's target point
    /// `center + object_offset`. Indices refer to the full, unfiltered
    /// lists. Recomputed from the current coordinates on every call, so the
    /// pairs stay valid after rescaling. Ties go to the lowest object index.
    pub fn get_hand_object_interactions(
        &self,
        object_threshold: f32,
        hand_threshold: f32,
    ) -> Vec<(usize, usize)> {
        let candidates: Vec<(usize, (f32, f32))> = self
            .objects
            .iter()
            .enumerate()
            .filter(|(_, object)| object.score >= object_threshold)
            .map(|(index, object)| (index, object.bbox.center()))
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        let mut interactions = Vec::new();
        for (hand_index, hand) in self.hands.iter().enumerate() {
            if hand.score < hand_threshold || hand.state == HandState::NoContact {
                continue;
            }
            let (center_x, center_y) = hand.bbox.center();
            let target = (center_x + hand.object_offset.x, center_y + hand.object_offset.y);
            let mut best: Option<(usize, f32)> = None;
            for (object_index, (object_x, object_y)) in &candidates {
                let dx = object_x - target.0;
                let dy = object_y - target.1;
                let distance = dx * dx + dy * dy;
                match best {
                    Some((_, best_distance)) if distance >= best_distance => {}
                    _ => best = Some((*object_index, distance)),
                }
            }
            if let Some((object_index, _)) = best {
                interactions.push((hand_index, object_index));
            }
        }
        interactions
    }

    pub fn scale(&mut self, width_factor: f32, height_factor: f32) {
        for hand in &mut self.hands {
            hand.scale(width_factor, height_factor);
        }
        for object in &mut self.objects {
            object.scale(width_factor, height_factor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_edge_midpoint() {
        let bbox = NormalizedBBox::new(1.0, 3.0, 2.0, 4.0);
        assert_eq!(bbox.center(), (1.5, 3.5));
    }

    #[test]
    fn center_int_rounds_ties_to_even() {
        let bbox = NormalizedBBox::new(1.0, 3.0, 2.0, 4.0);
        assert_eq!(bbox.center_int(), (2, 4));
    }

    #[test]
    fn width_and_height_from_edges() {
        let bbox = NormalizedBBox::new(1.0, 2.0, 3.0, 5.0);
        assert_eq!(bbox.width(), 2.0);
        assert_eq!(bbox.height(), 3.0);
        assert_eq!(bbox.top_left(), (1.0, 2.0));
        assert_eq!(bbox.bottom_right(), (3.0, 5.0));
    }

    #[test]
    fn coords_int_rounds_each_corner() {
        let bbox = NormalizedBBox::new(1.1, 2.1, 3.1, 4.1);
        assert_eq!(bbox.coords_int(), ((1, 2), (3, 4)));
    }

    #[test]
    fn center_scale_keeps_the_center_fixed() {
        let mut bbox = NormalizedBBox::new(10.0, 100.0, 30.0, 120.0);
        bbox.center_scale(2.0, 3.0);
        assert_eq!(bbox.left, 0.0);
        assert_eq!(bbox.right, 40.0);
        assert_eq!(bbox.top, 80.0);
        assert_eq!(bbox.bottom, 140.0);
    }

    #[test]
    fn float_vector_arithmetic() {
        let sum = FloatVector::new(1.0, 2.0) + FloatVector::new(3.0, 5.0);
        assert_eq!(sum.coord(), (4.0, 7.0));
        let doubled = FloatVector::new(1.0, 2.0) * 2.0;
        assert_eq!(doubled.coord(), (2.0, 4.0));
        let mut scaled = FloatVector::new(1.0, 2.0);
        scaled.scale(2.0, 4.0);
        assert_eq!(scaled.coord(), (2.0, 8.0));
    }

    fn sample_frame() -> FrameDetections {
        FrameDetections {
            video_id: "P01_101".to_string(),
            frame_number: 5,
            objects: vec![
                ObjectDetection {
                    bbox: NormalizedBBox::new(0.4, 0.0, 0.6, 0.2),
                    score: 0.9,
                },
                ObjectDetection {
                    bbox: NormalizedBBox::new(0.8, 0.8, 1.0, 1.0),
                    score: 0.9,
                },
            ],
            hands: vec![
                HandDetection {
                    bbox: NormalizedBBox::new(0.0, 0.0, 0.2, 0.2),
                    score: 0.95,
                    state: HandState::PortableObject,
                    object_offset: FloatVector::new(0.4, 0.0),
                    side: HandSide::Right,
                },
                HandDetection {
                    bbox: NormalizedBBox::new(0.5, 0.5, 0.7, 0.7),
                    score: 0.95,
                    state: HandState::NoContact,
                    object_offset: FloatVector::default(),
                    side: HandSide::Left,
                },
            ],
        }
    }

    #[test]
    fn interactions_skip_no_contact_and_low_score_hands() {
        let detections = sample_frame();
        assert_eq!(
            detections.get_hand_object_interactions(0.0, 0.5),
            vec![(0, 0)]
        );
        assert!(detections.get_hand_object_interactions(0.0, 0.99).is_empty());
    }

    #[test]
    fn interactions_survive_rescaling() {
        let mut detections = sample_frame();
        detections.scale(456.0, 256.0);
        assert_eq!(
            detections.get_hand_object_interactions(0.0, 0.5),
            vec![(0, 0)]
        );
    }

    #[test]
    fn scale_moves_boxes_and_offsets_together() {
        let mut detections = sample_frame();
        detections.scale(100.0, 200.0);
        assert_eq!(detections.hands[0].bbox.right, 20.0);
        assert_eq!(detections.hands[0].object_offset.x, 40.0);
        assert_eq!(detections.objects[1].bbox.bottom, 200.0);
    }

    #[test]
    fn filter_applies_per_detection_type() {
        let mut detections = sample_frame();
        detections.hands[1].score = 0.2;
        detections.filter_above_threshold(Some(0.95), Some(0.5));
        assert!(detections.objects.is_empty());
        assert_eq!(detections.hands.len(), 1);
    }
}
