//! Wire messages for releasable-domain records. Same framing discipline as
//! [`crate::raw::wire`], normalized single-precision coordinates instead of
//! pixel integers.

use anyhow::{anyhow, Result};

use crate::raw::{HandSide, HandState};
use crate::release;

#[derive(Copy, Clone, PartialEq, ::prost::Message)]
pub struct BBox {
    #[prost(float, required, tag = "1")]
    pub left: f32,
    #[prost(float, required, tag = "2")]
    pub top: f32,
    #[prost(float, required, tag = "3")]
    pub right: f32,
    #[prost(float, required, tag = "4")]
    pub bottom: f32,
}

#[derive(Copy, Clone, PartialEq, ::prost::Message)]
pub struct FloatVector {
    #[prost(float, required, tag = "1")]
    pub x: f32,
    #[prost(float, required, tag = "2")]
    pub y: f32,
}

#[derive(Copy, Clone, PartialEq, ::prost::Message)]
pub struct HandDetection {
    #[prost(message, required, tag = "1")]
    pub bbox: BBox,
    #[prost(float, required, tag = "2")]
    pub score: f32,
    #[prost(int32, required, tag = "3")]
    pub state: i32,
    #[prost(message, required, tag = "4")]
    pub object_offset: FloatVector,
    #[prost(int32, required, tag = "5")]
    pub side: i32,
}

#[derive(Copy, Clone, PartialEq, ::prost::Message)]
pub struct ObjectDetection {
    #[prost(message, required, tag = "1")]
    pub bbox: BBox,
    #[prost(float, required, tag = "2")]
    pub score: f32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Detections {
    #[prost(string, required, tag = "1")]
    pub video_id: ::prost::alloc::string::String,
    #[prost(uint32, required, tag = "2")]
    pub frame_number: u32,
    #[prost(message, repeated, tag = "3")]
    pub objects: ::prost::alloc::vec::Vec<ObjectDetection>,
    #[prost(message, repeated, tag = "4")]
    pub hands: ::prost::alloc::vec::Vec<HandDetection>,
}

impl From<release::NormalizedBBox> for BBox {
    fn from(bbox: release::NormalizedBBox) -> Self {
        Self {
            left: bbox.left,
            top: bbox.top,
            right: bbox.right,
            bottom: bbox.bottom,
        }
    }
}

impl From<BBox> for release::NormalizedBBox {
    fn from(bbox: BBox) -> Self {
        Self {
            left: bbox.left,
            top: bbox.top,
            right: bbox.right,
            bottom: bbox.bottom,
        }
    }
}

impl From<release::FloatVector> for FloatVector {
    fn from(vector: release::FloatVector) -> Self {
        Self {
            x: vector.x,
            y: vector.y,
        }
    }
}

impl From<FloatVector> for release::FloatVector {
    fn from(vector: FloatVector) -> Self {
        Self {
            x: vector.x,
            y: vector.y,
        }
    }
}

impl From<&release::HandDetection> for HandDetection {
    fn from(hand: &release::HandDetection) -> Self {
        Self {
            bbox: hand.bbox.into(),
            score: hand.score,
            state: hand.state.ordinal(),
            object_offset: hand.object_offset.into(),
            side: hand.side.ordinal(),
        }
    }
}

impl TryFrom<HandDetection> for release::HandDetection {
    type Error = anyhow::Error;

    fn try_from(hand: HandDetection) -> Result<Self> {
        Ok(Self {
            bbox: hand.bbox.into(),
            score: hand.score,
            state: HandState::from_ordinal(hand.state)?,
            object_offset: hand.object_offset.into(),
            side: HandSide::from_ordinal(hand.side)?,
        })
    }
}

impl From<&release::ObjectDetection> for ObjectDetection {
    fn from(object: &release::ObjectDetection) -> Self {
        Self {
            bbox: object.bbox.into(),
            score: object.score,
        }
    }
}

impl From<ObjectDetection> for release::ObjectDetection {
    fn from(object: ObjectDetection) -> Self {
        Self {
            bbox: object.bbox.into(),
            score: object.score,
        }
    }
}

impl From<&release::FrameDetections> for Detections {
    fn from(detections: &release::FrameDetections) -> Self {
        Self {
            video_id: detections.video_id.clone(),
            frame_number: detections.frame_number,
            objects: detections.objects.iter().map(Into::into).collect(),
            hands: detections.hands.iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<Detections> for release::FrameDetections {
    type Error = anyhow::Error;

    fn try_from(detections: Detections) -> Result<Self> {
        let video_id = detections.video_id;
        let frame_number = detections.frame_number;
        let hands = detections
            .hands
            .into_iter()
            .map(release::HandDetection::try_from)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| anyhow!("{} frame {}: {}", video_id, frame_number, e))?;
        let objects = detections.objects.into_iter().map(Into::into).collect();
        Ok(Self {
            video_id,
            frame_number,
            objects,
            hands,
        })
    }
}
