//! Wire messages for raw-domain records.
//!
//! These mirror the protobuf schema the archived raw detection files were
//! written with; field tags and scalar widths must not change. Scores and
//! offsets are single-precision on the wire. Enum ordinals travel as plain
//! `int32` and are validated on the way back into model types.

use anyhow::{anyhow, Result};

use crate::geometry;
use crate::raw;

#[derive(Copy, Clone, PartialEq, ::prost::Message)]
pub struct IntCoordinate {
    #[prost(sint32, required, tag = "1")]
    pub x: i32,
    #[prost(sint32, required, tag = "2")]
    pub y: i32,
}

#[derive(Copy, Clone, PartialEq, ::prost::Message)]
pub struct FloatCoordinate {
    #[prost(float, required, tag = "1")]
    pub x: f32,
    #[prost(float, required, tag = "2")]
    pub y: f32,
}

#[derive(Copy, Clone, PartialEq, ::prost::Message)]
pub struct BBox {
    #[prost(message, required, tag = "1")]
    pub top_left: IntCoordinate,
    #[prost(sint32, required, tag = "2")]
    pub width: i32,
    #[prost(sint32, required, tag = "3")]
    pub height: i32,
}

#[derive(Copy, Clone, PartialEq, ::prost::Message)]
pub struct OffsetVector {
    #[prost(float, required, tag = "1")]
    pub magnitude: f32,
    #[prost(message, required, tag = "2")]
    pub position: FloatCoordinate,
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
    pub offset: OffsetVector,
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

impl From<geometry::IntCoordinate> for IntCoordinate {
    fn from(coordinate: geometry::IntCoordinate) -> Self {
        Self {
            x: coordinate.x,
            y: coordinate.y,
        }
    }
}

impl From<IntCoordinate> for geometry::IntCoordinate {
    fn from(coordinate: IntCoordinate) -> Self {
        Self {
            x: coordinate.x,
            y: coordinate.y,
        }
    }
}

impl From<geometry::FloatCoordinate> for FloatCoordinate {
    fn from(coordinate: geometry::FloatCoordinate) -> Self {
        Self {
            x: coordinate.x,
            y: coordinate.y,
        }
    }
}

impl From<FloatCoordinate> for geometry::FloatCoordinate {
    fn from(coordinate: FloatCoordinate) -> Self {
        Self {
            x: coordinate.x,
            y: coordinate.y,
        }
    }
}

impl From<geometry::PixelBBox> for BBox {
    fn from(bbox: geometry::PixelBBox) -> Self {
        Self {
            top_left: bbox.top_left.into(),
            width: bbox.width,
            height: bbox.height,
        }
    }
}

impl From<BBox> for geometry::PixelBBox {
    fn from(bbox: BBox) -> Self {
        Self {
            top_left: bbox.top_left.into(),
            width: bbox.width,
            height: bbox.height,
        }
    }
}

impl From<geometry::OffsetVector> for OffsetVector {
    fn from(offset: geometry::OffsetVector) -> Self {
        Self {
            magnitude: offset.magnitude,
            position: offset.direction.into(),
        }
    }
}

impl From<OffsetVector> for geometry::OffsetVector {
    fn from(offset: OffsetVector) -> Self {
        Self {
            direction: offset.position.into(),
            magnitude: offset.magnitude,
        }
    }
}

impl From<&raw::HandDetection> for HandDetection {
    fn from(hand: &raw::HandDetection) -> Self {
        Self {
            bbox: hand.bbox.into(),
            score: hand.score,
            state: hand.state.ordinal(),
            offset: hand.offset.into(),
            side: hand.side.ordinal(),
        }
    }
}

impl TryFrom<HandDetection> for raw::HandDetection {
    type Error = anyhow::Error;

    fn try_from(hand: HandDetection) -> Result<Self> {
        Ok(Self {
            bbox: hand.bbox.into(),
            score: hand.score,
            state: raw::HandState::from_ordinal(hand.state)?,
            offset: hand.offset.into(),
            side: raw::HandSide::from_ordinal(hand.side)?,
        })
    }
}

impl From<&raw::ObjectDetection> for ObjectDetection {
    fn from(object: &raw::ObjectDetection) -> Self {
        Self {
            bbox: object.bbox.into(),
            score: object.score,
        }
    }
}

impl From<ObjectDetection> for raw::ObjectDetection {
    fn from(object: ObjectDetection) -> Self {
        Self {
            bbox: object.bbox.into(),
            score: object.score,
        }
    }
}

impl From<&raw::FrameDetections> for Detections {
    fn from(detections: &raw::FrameDetections) -> Self {
        Self {
            video_id: detections.video_id.clone(),
            frame_number: detections.frame_number,
            objects: detections.objects.iter().map(Into::into).collect(),
            hands: detections.hands.iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<Detections> for raw::FrameDetections {
    type Error = anyhow::Error;

    fn try_from(detections: Detections) -> Result<Self> {
        let video_id = detections.video_id;
        let frame_number = detections.frame_number;
        let hands = detections
            .hands
            .into_iter()
            .map(raw::HandDetection::try_from)
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
