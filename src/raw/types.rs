//! Raw-domain detection records: pixel-space boxes straight out of the
//! detector, one record per video frame.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

use crate::geometry::{FloatCoordinate, OffsetVector, PixelBBox};

/// Fixed length of one raw detector output row.
///
/// Layout: `[left, top, right, bottom, score, state, offset_magnitude,
/// offset_x, offset_y, side]`. Object rows carry the same shape with
/// indices 5..10 unused.
pub const DETECTION_ROW_LEN: usize = 10;

/// What a detected hand is touching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandState {
    NoContact,
    SelfContact,
    AnotherPerson,
    PortableObject,
    StationaryObject,
}

impl HandState {
    /// Decode the detector's state ordinal. Out-of-range values are a
    /// decode error, never a silent default.
    pub fn from_ordinal(ordinal: i32) -> Result<Self> {
        match ordinal {
            0 => Ok(HandState::NoContact),
            1 => Ok(HandState::SelfContact),
            2 => Ok(HandState::AnotherPerson),
            3 => Ok(HandState::PortableObject),
            4 => Ok(HandState::StationaryObject),
            other => Err(anyhow!("invalid hand state ordinal: {}", other)),
        }
    }

    pub fn ordinal(self) -> i32 {
        match self {
            HandState::NoContact => 0,
            HandState::SelfContact => 1,
            HandState::AnotherPerson => 2,
            HandState::PortableObject => 3,
            HandState::StationaryObject => 4,
        }
    }
}

/// Which hand a detection refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub fn from_ordinal(ordinal: i32) -> Result<Self> {
        match ordinal {
            0 => Ok(HandSide::Left),
            1 => Ok(HandSide::Right),
            other => Err(anyhow!("invalid hand side ordinal: {}", other)),
        }
    }

    pub fn ordinal(self) -> i32 {
        match self {
            HandSide::Left => 0,
            HandSide::Right => 1,
        }
    }
}

/// A detected hand: pixel box, confidence, contact state, side, and the
/// offset vector pointing toward the manipulated object. The offset only
/// points at a real object when `state != NoContact`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandDetection {
    pub bbox: PixelBBox,
    pub score: f32,
    pub state: HandState,
    pub offset: OffsetVector,
    pub side: HandSide,
}

impl HandDetection {
    /// Decode one raw detector row of exactly [`DETECTION_ROW_LEN`] scalars.
    pub fn from_detection(row: &[f32]) -> Result<Self> {
        let (bbox, score) = decode_row_common(row, "hand")?;
        let state = HandState::from_ordinal(decode_ordinal(row[5], "hand state")?)?;
        let offset = OffsetVector::from_detection([row[6], row[7], row[8]]);
        let side = HandSide::from_ordinal(decode_ordinal(row[9], "hand side")?)?;
        Ok(Self {
            bbox,
            score,
            state,
            offset,
            side,
        })
    }

    pub fn scale(&mut self, width_factor: f32, height_factor: f32) {
        self.bbox.scale(width_factor, height_factor);
        self.offset.scale(width_factor, height_factor);
    }
}

/// A detected manipulable object: pixel box plus confidence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectDetection {
    pub bbox: PixelBBox,
    pub score: f32,
}

impl ObjectDetection {
    /// Decode one raw detector row. Indices 5..10 are present but unused
    /// for objects; the length is still validated.
    pub fn from_detection(row: &[f32]) -> Result<Self> {
        let (bbox, score) = decode_row_common(row, "object")?;
        Ok(Self { bbox, score })
    }

    pub fn scale(&mut self, width_factor: f32, height_factor: f32) {
        self.bbox.scale(width_factor, height_factor);
    }
}

/// Ordinals are truncated toward zero, as the original pipeline did. A
/// non-finite scalar is a decode error; `NaN as i32` would otherwise
/// silently decode as ordinal 0.
fn decode_ordinal(value: f32, field: &str) -> Result<i32> {
    if !value.is_finite() {
        bail!("non-finite {} ordinal: {}", field, value);
    }
    Ok(value as i32)
}

fn decode_row_common(row: &[f32], kind: &str) -> Result<(PixelBBox, f32)> {
    if row.len() != DETECTION_ROW_LEN {
        bail!(
            "malformed {} detection row: expected {} values, got {}",
            kind,
            DETECTION_ROW_LEN,
            row.len()
        );
    }
    let bbox = PixelBBox::from_corners(row[0], row[1], row[2], row[3]);
    Ok((bbox, row[4]))
}

/// All hand and object detections for one video frame, in detector output
/// order. Order is preserved through serialization; `scale` and
/// `filter_above_threshold` mutate in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameDetections {
    pub video_id: String,
    pub frame_number: u32,
    pub objects: Vec<ObjectDetection>,
    pub hands: Vec<HandDetection>,
}

impl FrameDetections {
    /// Decode a frame's worth of raw detector rows. Any malformed row
    /// fails the whole frame.
    pub fn from_detections(
        video_id: &str,
        frame_number: u32,
        hand_rows: &[&[f32]],
        object_rows: &[&[f32]],
    ) -> Result<Self> {
        let hands = hand_rows
            .iter()
            .map(|row| HandDetection::from_detection(row))
            .collect::<Result<Vec<_>>>()?;
        let objects = object_rows
            .iter()
            .map(|row| ObjectDetection::from_detection(row))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            video_id: video_id.to_string(),
            frame_number,
            objects,
            hands,
        })
    }

    /// Drop detections scoring below the given thresholds, in place.
    /// `None` skips filtering for that detection type. Relative order of
    /// the survivors is preserved.
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

    /// For each hand (in order), the index into the *unfiltered* objects
    /// list of the object nearest to the hand's predicted target point
    /// `center + offset.displacement()`, by squared Euclidean distance.
    ///
    /// `None` marks hands not in contact with anything. Objects scoring
    /// below `object_threshold` are excluded from candidacy, but returned
    /// indices always refer to the original list. Returns an empty vec
    /// when there are no hands or no candidate objects. Equidistant
    /// candidates resolve to the lowest index.
    ///
    /// The correspondence is recomputed from current coordinates on every
    /// call, so it stays consistent after rescaling.
    pub fn compute_hand_to_object_correspondence(
        &self,
        object_threshold: f32,
    ) -> Vec<Option<usize>> {
        let candidates: Vec<(usize, FloatCoordinate)> = self
            .objects
            .iter()
            .enumerate()
            .filter(|(_, object)| object.score >= object_threshold)
            .map(|(index, object)| {
                let center = object.bbox.center();
                (index, FloatCoordinate::new(center.x as f32, center.y as f32))
            })
            .collect();
        if candidates.is_empty() || self.hands.is_empty() {
            return Vec::new();
        }

        self.hands
            .iter()
            .map(|hand| {
                if hand.state == HandState::NoContact {
                    return None;
                }
                let center = hand.bbox.center();
                let target = FloatCoordinate::new(center.x as f32, center.y as f32)
                    + hand.offset.displacement();
                let mut best: Option<(usize, f32)> = None;
                for (index, object_center) in &candidates {
                    let dx = object_center.x - target.x;
                    let dy = object_center.y - target.y;
                    let distance = dx * dx + dy * dy;
                    match best {
                        Some((_, best_distance)) if distance >= best_distance => {}
                        _ => best = Some((*index, distance)),
                    }
                }
                best.map(|(index, _)| index)
            })
            .collect()
    }

    /// Rescale every detection in place. Hands and objects are mutated
    /// independently, so iteration order does not matter.
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
    use crate::geometry::IntCoordinate;

    fn hand_at(
        center: (i32, i32),
        state: HandState,
        direction: (f32, f32),
        magnitude: f32,
    ) -> HandDetection {
        HandDetection {
            bbox: PixelBBox::new(IntCoordinate::new(center.0, center.1), 0, 0),
            score: 0.9,
            state,
            offset: OffsetVector::new(FloatCoordinate::new(direction.0, direction.1), magnitude),
            side: HandSide::Right,
        }
    }

    fn object_at(center: (i32, i32), score: f32) -> ObjectDetection {
        ObjectDetection {
            bbox: PixelBBox::new(IntCoordinate::new(center.0, center.1), 0, 0),
            score,
        }
    }

    fn frame(objects: Vec<ObjectDetection>, hands: Vec<HandDetection>) -> FrameDetections {
        FrameDetections {
            video_id: "P01_101".to_string(),
            frame_number: 1,
            objects,
            hands,
        }
    }

    #[test]
    fn hand_row_decodes_every_field() {
        let row = [
            10.0, 20.0, 30.0, 60.0, 0.75, 3.0, 0.015625, 0.0625, -0.125, 1.0,
        ];
        let hand = HandDetection::from_detection(&row).unwrap();
        assert_eq!(hand.bbox.top_left.xy(), (10, 20));
        assert_eq!(hand.bbox.width, 20);
        assert_eq!(hand.bbox.height, 40);
        assert_eq!(hand.score, 0.75);
        assert_eq!(hand.state, HandState::PortableObject);
        assert_eq!(hand.offset.magnitude, 15.625);
        assert_eq!(hand.side, HandSide::Right);
    }

    #[test]
    fn short_row_is_a_decode_error() {
        let row = [10.0, 20.0, 30.0, 60.0, 0.75, 3.0, 0.1, 0.2, 0.3];
        assert!(HandDetection::from_detection(&row).is_err());
        assert!(ObjectDetection::from_detection(&row).is_err());
    }

    #[test]
    fn out_of_range_state_ordinal_is_rejected() {
        let row = [10.0, 20.0, 30.0, 60.0, 0.75, 5.0, 0.1, 0.2, 0.3, 0.0];
        let err = HandDetection::from_detection(&row).unwrap_err();
        assert!(err.to_string().contains("hand state ordinal"));
    }

    #[test]
    fn out_of_range_side_ordinal_is_rejected() {
        let row = [10.0, 20.0, 30.0, 60.0, 0.75, 0.0, 0.1, 0.2, 0.3, 2.0];
        assert!(HandDetection::from_detection(&row).is_err());
    }

    #[test]
    fn nan_state_ordinal_is_rejected_not_defaulted() {
        let row = [10.0, 20.0, 30.0, 60.0, 0.75, f32::NAN, 0.1, 0.2, 0.3, 0.0];
        let err = HandDetection::from_detection(&row).unwrap_err();
        assert!(err.to_string().contains("non-finite hand state ordinal"));
    }

    #[test]
    fn non_finite_side_ordinal_is_rejected() {
        let nan_row = [10.0, 20.0, 30.0, 60.0, 0.75, 0.0, 0.1, 0.2, 0.3, f32::NAN];
        let err = HandDetection::from_detection(&nan_row).unwrap_err();
        assert!(err.to_string().contains("non-finite hand side ordinal"));

        let inf_row = [
            10.0,
            20.0,
            30.0,
            60.0,
            0.75,
            0.0,
            0.1,
            0.2,
            0.3,
            f32::INFINITY,
        ];
        assert!(HandDetection::from_detection(&inf_row).is_err());
    }

    #[test]
    fn object_row_ignores_hand_fields() {
        // State ordinal 9 would be invalid for a hand; objects don't read it.
        let row = [1.0, 2.0, 5.0, 7.0, 0.5, 9.0, 0.0, 0.0, 0.0, 9.0];
        let object = ObjectDetection::from_detection(&row).unwrap();
        assert_eq!(object.score, 0.5);
        assert_eq!(object.bbox.width, 4);
    }

    #[test]
    fn filter_retains_at_or_above_threshold_in_order() {
        let mut detections = frame(
            vec![
                object_at((0, 0), 0.3),
                object_at((1, 0), 0.6),
                object_at((2, 0), 0.5),
            ],
            vec![],
        );
        detections.filter_above_threshold(Some(0.5), None);
        let scores: Vec<f32> = detections.objects.iter().map(|o| o.score).collect();
        assert_eq!(scores, vec![0.6, 0.5]);
    }

    #[test]
    fn filter_none_skips_that_detection_type() {
        let mut detections = frame(
            vec![object_at((0, 0), 0.1)],
            vec![hand_at((0, 0), HandState::NoContact, (1.0, 0.0), 0.0)],
        );
        detections.filter_above_threshold(None, Some(0.95));
        assert_eq!(detections.objects.len(), 1);
        assert!(detections.hands.is_empty());
    }

    #[test]
    fn correspondence_picks_nearest_object_to_target_point() {
        let detections = frame(
            vec![object_at((5, 0), 0.9), object_at((100, 100), 0.9)],
            vec![hand_at((0, 0), HandState::PortableObject, (1.0, 0.0), 5.0)],
        );
        assert_eq!(
            detections.compute_hand_to_object_correspondence(0.0),
            vec![Some(0)]
        );
    }

    #[test]
    fn no_contact_hand_has_no_correspondence() {
        let detections = frame(
            vec![object_at((0, 0), 0.9)],
            vec![hand_at((0, 0), HandState::NoContact, (1.0, 0.0), 1.0)],
        );
        assert_eq!(
            detections.compute_hand_to_object_correspondence(0.0),
            vec![None]
        );
    }

    #[test]
    fn correspondence_indices_refer_to_unfiltered_list() {
        // Object 0 is below threshold; the nearest candidate is index 2.
        let detections = frame(
            vec![
                object_at((5, 0), 0.1),
                object_at((100, 100), 0.9),
                object_at((6, 0), 0.9),
            ],
            vec![hand_at((0, 0), HandState::PortableObject, (1.0, 0.0), 5.0)],
        );
        assert_eq!(
            detections.compute_hand_to_object_correspondence(0.5),
            vec![Some(2)]
        );
    }

    #[test]
    fn correspondence_empty_when_no_candidates() {
        let detections = frame(
            vec![object_at((5, 0), 0.1)],
            vec![hand_at((0, 0), HandState::PortableObject, (1.0, 0.0), 5.0)],
        );
        assert!(detections
            .compute_hand_to_object_correspondence(0.5)
            .is_empty());
    }

    #[test]
    fn correspondence_empty_when_no_hands() {
        let detections = frame(vec![object_at((5, 0), 0.9)], vec![]);
        assert!(detections
            .compute_hand_to_object_correspondence(0.0)
            .is_empty());
    }

    #[test]
    fn equidistant_objects_resolve_to_lowest_index() {
        let detections = frame(
            vec![object_at((5, 0), 0.9), object_at((-5, 0), 0.9)],
            vec![hand_at((0, 0), HandState::StationaryObject, (0.0, 1.0), 0.0)],
        );
        assert_eq!(
            detections.compute_hand_to_object_correspondence(0.0),
            vec![Some(0)]
        );
    }

    #[test]
    fn scale_applies_to_every_detection() {
        let mut detections = frame(
            vec![object_at((10, 10), 0.9)],
            vec![hand_at((4, 4), HandState::PortableObject, (1.0, 0.0), 10.0)],
        );
        detections.scale(2.0, 2.0);
        assert_eq!(detections.objects[0].bbox.top_left.xy(), (20, 20));
        assert_eq!(detections.hands[0].bbox.top_left.xy(), (8, 8));
        assert_eq!(detections.hands[0].offset.magnitude, 20.0);
    }
}
