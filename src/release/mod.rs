mod types;
pub mod wire;

pub use types::{FloatVector, FrameDetections, HandDetection, NormalizedBBox, ObjectDetection};

// Contact state and side are the same closed sets in both domains; the
// releasable records reuse the raw definitions.
pub use crate::raw::{HandSide, HandState};
