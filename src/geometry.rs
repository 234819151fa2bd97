//! Coordinate primitives shared by the raw detection records.
//!
//! All scaling is anisotropic: a width factor applied to `x` and a height
//! factor applied to `y`, independently. Integer coordinates round ties to
//! even, matching the rounding the detector pipeline used when the archived
//! records were produced.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// Training-time loss scaling undone by [`OffsetVector::from_detection`].
/// The magnitude was divided by 1000 and the components by 10 when the
/// model was trained; decode applies the exact inverse in single precision.
const MAGNITUDE_SCALE: f32 = 1e3;
const COMPONENT_SCALE: f32 = 10.0;

/// A 2D pixel-space point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntCoordinate {
    pub x: i32,
    pub y: i32,
}

impl IntCoordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn xy(self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Multiply `x` by `width_factor` and `y` by `height_factor` in place,
    /// rounding ties to even.
    pub fn scale(&mut self, width_factor: f32, height_factor: f32) {
        self.x = (self.x as f32 * width_factor).round_ties_even() as i32;
        self.y = (self.y as f32 * height_factor).round_ties_even() as i32;
    }
}

impl Add for IntCoordinate {
    type Output = IntCoordinate;

    fn add(self, other: IntCoordinate) -> IntCoordinate {
        IntCoordinate::new(self.x + other.x, self.y + other.y)
    }
}

/// A 2D point with single-precision components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatCoordinate {
    pub x: f32,
    pub y: f32,
}

impl FloatCoordinate {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn xy(self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn scale(&mut self, width_factor: f32, height_factor: f32) {
        self.x *= width_factor;
        self.y *= height_factor;
    }
}

impl Add for FloatCoordinate {
    type Output = FloatCoordinate;

    fn add(self, other: FloatCoordinate) -> FloatCoordinate {
        FloatCoordinate::new(self.x + other.x, self.y + other.y)
    }
}

impl Mul<f32> for FloatCoordinate {
    type Output = FloatCoordinate;

    fn mul(self, scaler: f32) -> FloatCoordinate {
        FloatCoordinate::new(self.x * scaler, self.y * scaler)
    }
}

/// An axis-aligned box in the raw pixel domain: integer top-left corner plus
/// width/height extent. Values are assumed within frame bounds upstream; no
/// clamping happens here. The normalized public-domain box is a separate
/// type, [`crate::release::NormalizedBBox`], bridged only by
/// [`crate::convert::Converter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBBox {
    pub top_left: IntCoordinate,
    pub width: i32,
    pub height: i32,
}

impl PixelBBox {
    pub fn new(top_left: IntCoordinate, width: i32, height: i32) -> Self {
        Self {
            top_left,
            width,
            height,
        }
    }

    /// Build from the four corner scalars of a raw detector row, rounding
    /// each coordinate and the extents ties-to-even.
    pub fn from_corners(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            top_left: IntCoordinate::new(
                left.round_ties_even() as i32,
                top.round_ties_even() as i32,
            ),
            width: (right - left).round_ties_even() as i32,
            height: (bottom - top).round_ties_even() as i32,
        }
    }

    /// Rounded integer center of the box.
    pub fn center(&self) -> IntCoordinate {
        self.top_left
            + IntCoordinate::new(
                (self.width as f32 / 2.0).round_ties_even() as i32,
                (self.height as f32 / 2.0).round_ties_even() as i32,
            )
    }

    /// `[top_left, bottom_right]` pixel pairs, the shape renderers draw with.
    pub fn coords_int(&self) -> [(i32, i32); 2] {
        [
            (self.top_left.x, self.top_left.y),
            (self.top_left.x + self.width, self.top_left.y + self.height),
        ]
    }

    pub fn scale(&mut self, width_factor: f32, height_factor: f32) {
        self.top_left.scale(width_factor, height_factor);
        self.width = (self.width as f32 * width_factor).round_ties_even() as i32;
        self.height = (self.height as f32 * height_factor).round_ties_even() as i32;
    }
}

/// A hand's predicted displacement toward the object it manipulates, stored
/// as a unit direction plus a magnitude in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OffsetVector {
    pub direction: FloatCoordinate,
    pub magnitude: f32,
}

impl OffsetVector {
    pub fn new(direction: FloatCoordinate, magnitude: f32) -> Self {
        Self {
            direction,
            magnitude,
        }
    }

    /// Decode the `[magnitude, x, y]` triple of a raw detector row, undoing
    /// the training-time loss scaling. The constants must stay bit-exact in
    /// single precision for compatibility with archived detection files.
    pub fn from_detection(triple: [f32; 3]) -> Self {
        let [magnitude, x, y] = triple;
        Self {
            direction: FloatCoordinate::new(x * COMPONENT_SCALE, y * COMPONENT_SCALE),
            magnitude: magnitude * MAGNITUDE_SCALE,
        }
    }

    /// The absolute displacement `direction * magnitude`.
    pub fn displacement(&self) -> FloatCoordinate {
        self.direction * self.magnitude
    }

    /// Rescale so that the absolute displacement transforms component-wise,
    /// then re-decompose into a unit direction and a magnitude.
    ///
    /// A zero-norm displacement keeps its direction and a zero magnitude;
    /// the division by the norm is skipped so no NaN is produced.
    pub fn scale(&mut self, width_factor: f32, height_factor: f32) {
        let absolute = self.displacement();
        let x = absolute.x * width_factor;
        let y = absolute.y * height_factor;
        let magnitude = (x * x + y * y).sqrt();
        if magnitude > 0.0 {
            self.direction = FloatCoordinate::new(x / magnitude, y / magnitude);
        }
        self.magnitude = magnitude;
    }
}
