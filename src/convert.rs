//! Raw to releasable conversion: the only bridge between the pixel-space
//! training-internal records and the normalized public records.

use anyhow::{bail, Result};

use crate::geometry::{OffsetVector, PixelBBox};
use crate::raw;
use crate::release::{self, FloatVector, NormalizedBBox};

/// Stateless converter parameterized by the pixel dimensions the detector
/// operated on. Produces new releasable values; never mutates its input.
#[derive(Clone, Copy, Debug)]
pub struct Converter {
    frame_width: u32,
    frame_height: u32,
}

impl Converter {
    pub fn new(frame_width: u32, frame_height: u32) -> Result<Self> {
        if frame_width == 0 || frame_height == 0 {
            bail!(
                "frame dimensions must be non-zero, got {}x{}",
                frame_width,
                frame_height
            );
        }
        Ok(Self {
            frame_width,
            frame_height,
        })
    }

    /// Convert a whole video's frame list, preserving order.
    pub fn convert_video(&self, frames: &[raw::FrameDetections]) -> Vec<release::FrameDetections> {
        frames.iter().map(|frame| self.convert_frame(frame)).collect()
    }

    pub fn convert_frame(&self, frame: &raw::FrameDetections) -> release::FrameDetections {
        release::FrameDetections {
            video_id: frame.video_id.clone(),
            frame_number: frame.frame_number,
            objects: frame
                .objects
                .iter()
                .map(|object| self.convert_object(object))
                .collect(),
            hands: frame.hands.iter().map(|hand| self.convert_hand(hand)).collect(),
        }
    }

    pub fn convert_object(&self, object: &raw::ObjectDetection) -> release::ObjectDetection {
        release::ObjectDetection {
            bbox: self.convert_bbox(&object.bbox),
            score: object.score,
        }
    }

    pub fn convert_hand(&self, hand: &raw::HandDetection) -> release::HandDetection {
        release::HandDetection {
            bbox: self.convert_bbox(&hand.bbox),
            score: hand.score,
            state: hand.state,
            object_offset: self.convert_offset(&hand.offset),
            side: hand.side,
        }
    }

    /// Normalize each edge by the frame dimension and clamp into `[0, 1]`,
    /// absorbing detector outputs that slightly exceed the frame bounds.
    pub fn convert_bbox(&self, bbox: &PixelBBox) -> NormalizedBBox {
        let width = self.frame_width as f32;
        let height = self.frame_height as f32;
        NormalizedBBox {
            left: (bbox.top_left.x as f32 / width).clamp(0.0, 1.0),
            top: (bbox.top_left.y as f32 / height).clamp(0.0, 1.0),
            right: ((bbox.top_left.x + bbox.width) as f32 / width).clamp(0.0, 1.0),
            bottom: ((bbox.top_left.y + bbox.height) as f32 / height).clamp(0.0, 1.0),
        }
    }

    /// Collapse direction and magnitude into an absolute normalized
    /// displacement, per-axis clamped into `[-1, 1]`.
    pub fn convert_offset(&self, offset: &OffsetVector) -> FloatVector {
        FloatVector {
            x: (offset.direction.x * offset.magnitude / self.frame_width as f32)
                .clamp(-1.0, 1.0),
            y: (offset.direction.y * offset.magnitude / self.frame_height as f32)
                .clamp(-1.0, 1.0),
        }
    }
}
