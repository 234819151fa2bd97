//! Per-frame hand-object detection records for video datasets.
//!
//! Two coordinate domains cover the data's lifecycle:
//!
//! 1. **Raw** ([`raw`]): pixel-space records decoded straight from detector
//!    output rows. Integer boxes, offset vectors as unit direction plus
//!    magnitude. Training-internal.
//! 2. **Releasable** ([`release`]): normalized `[0, 1]` records for public
//!    distribution. Produced from raw records by [`convert::Converter`],
//!    the single bridge between the domains.
//!
//! # Module Structure
//!
//! - [`geometry`]: coordinate primitives, pixel boxes, offset vectors
//! - [`raw`] / [`release`]: the two record domains plus their wire messages
//! - [`convert`]: raw to releasable conversion
//! - [`check`]: validation pass over releasable files
//! - [`io`]: versioned sequence-of-records container
//!
//! Hand-object correspondence is computed on demand from current
//! coordinates, never stored, so it stays consistent after rescaling.

pub mod check;
pub mod convert;
pub mod geometry;
pub mod io;
pub mod raw;
pub mod release;

pub use check::DetectionChecker;
pub use convert::Converter;
pub use geometry::{FloatCoordinate, IntCoordinate, OffsetVector, PixelBBox};
pub use raw::{HandSide, HandState};
