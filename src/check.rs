//! Sanity checks over releasable detection files.
//!
//! Core types do not validate at construction time; this pass catches
//! out-of-range values before a dataset ships. The first violation aborts
//! the run with enough context to locate the bad record.

use anyhow::{bail, Result};

use crate::release::{FloatVector, FrameDetections, HandDetection, NormalizedBBox, ObjectDetection};

pub struct DetectionChecker {
    expected_frames: Option<usize>,
}

impl DetectionChecker {
    pub fn new(expected_frames: Option<usize>) -> Self {
        Self { expected_frames }
    }

    /// Check a whole video's frame list. Fails on the first bad record.
    pub fn check(&self, video_detections: &[FrameDetections]) -> Result<()> {
        if let Some(expected) = self.expected_frames {
            if video_detections.len() != expected {
                bail!(
                    "expected video to contain {} frame records, but contained {}",
                    expected,
                    video_detections.len()
                );
            }
        }
        for frame_detections in video_detections {
            self.check_frame(frame_detections)?;
        }
        Ok(())
    }

    pub fn check_frame(&self, frame: &FrameDetections) -> Result<()> {
        let context = RecordContext {
            video_id: &frame.video_id,
            frame_number: frame.frame_number,
        };
        if frame.frame_number < 1 {
            bail!("{}: frame_number must be >= 1", context);
        }
        if let Some(expected) = self.expected_frames {
            if frame.frame_number as usize > expected {
                bail!(
                    "{}: frame_number exceeds expected frame count {}",
                    context,
                    expected
                );
            }
        }
        for object in &frame.objects {
            check_object(context, object)?;
        }
        for hand in &frame.hands {
            check_hand(context, hand)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
struct RecordContext<'a> {
    video_id: &'a str,
    frame_number: u32,
}

impl std::fmt::Display for RecordContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} frame {}", self.video_id, self.frame_number)
    }
}

fn check_object(context: RecordContext<'_>, object: &ObjectDetection) -> Result<()> {
    check_bbox(context, &object.bbox)?;
    check_score(context, object.score)
}

fn check_hand(context: RecordContext<'_>, hand: &HandDetection) -> Result<()> {
    check_bbox(context, &hand.bbox)?;
    check_score(context, hand.score)?;
    check_vector(context, &hand.object_offset)
}

fn check_score(context: RecordContext<'_>, score: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&score) {
        bail!("{}: score {} outside [0, 1]", context, score);
    }
    Ok(())
}

fn check_bbox(context: RecordContext<'_>, bbox: &NormalizedBBox) -> Result<()> {
    for (name, value) in [
        ("left", bbox.left),
        ("top", bbox.top),
        ("right", bbox.right),
        ("bottom", bbox.bottom),
    ] {
        if !(0.0..=1.0).contains(&value) {
            bail!("{}: bbox {} {} outside [0, 1]", context, name, value);
        }
    }
    if bbox.left > bbox.right {
        bail!(
            "{}: bbox left {} greater than right {}",
            context,
            bbox.left,
            bbox.right
        );
    }
    if bbox.top > bbox.bottom {
        bail!(
            "{}: bbox top {} greater than bottom {}",
            context,
            bbox.top,
            bbox.bottom
        );
    }
    Ok(())
}

fn check_vector(context: RecordContext<'_>, vector: &FloatVector) -> Result<()> {
    for (name, value) in [("x", vector.x), ("y", vector.y)] {
        if !(-1.0..=1.0).contains(&value) {
            bail!(
                "{}: offset component {} {} outside [-1, 1]",
                context,
                name,
                value
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::{HandSide, HandState};

    fn valid_frame(frame_number: u32) -> FrameDetections {
        FrameDetections {
            video_id: "P01_101".to_string(),
            frame_number,
            objects: vec![ObjectDetection {
                bbox: NormalizedBBox::new(0.1, 0.2, 0.3, 0.4),
                score: 0.5,
            }],
            hands: vec![HandDetection {
                bbox: NormalizedBBox::new(0.2, 0.3, 0.4, 0.5),
                score: 0.8,
                state: HandState::PortableObject,
                object_offset: FloatVector::new(0.1, -0.1),
                side: HandSide::Right,
            }],
        }
    }

    #[test]
    fn valid_video_passes() {
        let checker = DetectionChecker::new(Some(2));
        assert!(checker.check(&[valid_frame(1), valid_frame(2)]).is_ok());
    }

    #[test]
    fn frame_count_mismatch_aborts() {
        let checker = DetectionChecker::new(Some(3));
        let err = checker.check(&[valid_frame(1)]).unwrap_err();
        assert!(err.to_string().contains("3 frame records"));
    }

    #[test]
    fn frame_number_beyond_expected_is_reported() {
        let checker = DetectionChecker::new(Some(2));
        let err = checker.check(&[valid_frame(1), valid_frame(9)]).unwrap_err();
        assert!(err.to_string().contains("frame 9"));
    }

    #[test]
    fn out_of_range_score_names_the_record() {
        let mut frame = valid_frame(1);
        frame.objects[0].score = 1.5;
        let err = DetectionChecker::new(None).check_frame(&frame).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("P01_101 frame 1"));
        assert!(message.contains("score 1.5"));
    }

    #[test]
    fn inverted_bbox_is_rejected() {
        let mut frame = valid_frame(1);
        frame.hands[0].bbox = NormalizedBBox::new(0.6, 0.3, 0.4, 0.5);
        let err = DetectionChecker::new(None).check_frame(&frame).unwrap_err();
        assert!(err.to_string().contains("left"));
    }

    #[test]
    fn bbox_edge_outside_unit_range_is_rejected() {
        let mut frame = valid_frame(1);
        frame.objects[0].bbox.bottom = 1.2;
        let err = DetectionChecker::new(None).check_frame(&frame).unwrap_err();
        assert!(err.to_string().contains("bottom"));
    }

    #[test]
    fn oversized_offset_component_is_rejected() {
        let mut frame = valid_frame(1);
        frame.hands[0].object_offset.y = -1.5;
        let err = DetectionChecker::new(None).check_frame(&frame).unwrap_err();
        assert!(err.to_string().contains("offset component y"));
    }

    #[test]
    fn zero_frame_number_is_rejected() {
        let frame = valid_frame(0);
        assert!(DetectionChecker::new(None).check_frame(&frame).is_err());
    }
}
