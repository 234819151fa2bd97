mod types;
pub mod wire;

pub use types::{
    FrameDetections, HandDetection, HandSide, HandState, ObjectDetection, DETECTION_ROW_LEN,
};
