//! Vector and rotation helpers on top of [`glam::DVec3`].
//!
//! glam already provides the arithmetic (`+`, `-`, `*`, `/`, and their
//! assigning forms), the dot product and the cross product. This module adds
//! the operations the orbit and hierarchy code needs on top of that:
//! in-place axis–angle rotation, fast rotations about the coordinate axes,
//! and an explicit rotation matrix used to cross-check the closed form.

use glam::{DMat3, DVec3};

use crate::VectorError;

/// A [`DVec3`] used semantically as a location, in meters.
pub type Position = DVec3;

/// Creates a [`Position`] on the XY plane.
///
/// # Example
/// ```
/// use astrarium::position2;
///
/// let p = position2(3.0, 4.0);
/// assert_eq!(p.z, 0.0);
/// ```
#[inline]
pub fn position2(x: f64, y: f64) -> Position {
    DVec3::new(x, y, 0.0)
}

/// Extra vector operations used throughout the kernel.
///
/// Mutating methods return `&mut Self` so that they can be chained.
/// Operations that would divide by a zero length return
/// [`VectorError::ZeroLength`] instead of silently producing `NaN`s.
///
/// # Example
/// ```
/// use glam::DVec3;
/// use astrarium::Vector;
///
/// let mut v = DVec3::new(1.0, 0.0, 0.0);
/// v.rotate_about_z(std::f64::consts::FRAC_PI_2).rotate_about_x(std::f64::consts::FRAC_PI_2);
///
/// assert!(v.approx_eq(DVec3::new(0.0, 0.0, 1.0), 1e-12));
/// ```
pub trait Vector: Sized {
    /// Gets the length of the vector.
    fn magnitude(&self) -> f64;

    /// Gets the squared length of the vector.
    fn magnitude_squared(&self) -> f64;

    /// Normalises the vector in place and returns its former length.
    ///
    /// # Errors
    /// Returns [`VectorError::ZeroLength`] if the vector has no length.
    /// The vector is left untouched in that case.
    fn normalise(&mut self) -> Result<f64, VectorError>;

    /// Returns a normalised copy of this vector.
    ///
    /// # Errors
    /// Returns [`VectorError::ZeroLength`] if the vector has no length.
    fn normalised(self) -> Result<Self, VectorError>;

    /// Rotates the vector in place around an arbitrary axis by `theta` radians.
    ///
    /// The vector and the axis are normalised, the closed-form axis–angle
    /// rotation is applied, and the original length is restored afterwards.
    /// The axis does not need to be a unit vector.
    ///
    /// # Errors
    /// Returns [`VectorError::ZeroLength`] if either the vector or the axis has
    /// no length.
    fn rotate_around(&mut self, axis: DVec3, theta: f64) -> Result<&mut Self, VectorError>;

    /// Returns a copy of this vector rotated around `axis` by `theta` radians.
    ///
    /// See [`rotate_around`][Vector::rotate_around].
    fn rotated_around(self, axis: DVec3, theta: f64) -> Result<Self, VectorError>;

    /// Rotates the vector in place using the explicit rotation matrix
    /// from [`rotation_matrix`].
    ///
    /// This gives the same result as [`rotate_around`][Vector::rotate_around] and exists
    /// to cross-check it.
    fn rotate_with_matrix(&mut self, axis: DVec3, theta: f64) -> Result<&mut Self, VectorError>;

    /// Rotates the vector around the Z axis by `theta` radians.
    ///
    /// This is a plain 2x2 rotation of the X and Y components and never fails.
    fn rotate_about_z(&mut self, theta: f64) -> &mut Self;

    /// Rotates the vector around the X axis by `theta` radians.
    fn rotate_about_x(&mut self, theta: f64) -> &mut Self;

    /// Gets the angle between this vector and another, in radians.
    ///
    /// # Errors
    /// Returns [`VectorError::ZeroLength`] if either vector has no length.
    fn angle_with(&self, other: DVec3) -> Result<f64, VectorError>;

    /// Gets the angle of this vector's projection on the XY plane,
    /// measured counter-clockwise from the X axis.
    fn longitude(&self) -> f64;

    /// Gets the angle of the line going from this position to another one.
    ///
    /// # Errors
    /// Returns [`VectorError::NotPlanar`] if either position has a non-zero
    /// Z component.
    fn angle_of_line_to(&self, other: DVec3) -> Result<f64, VectorError>;

    /// Checks whether this position lies within `radius` of `center`.
    /// Points exactly on the boundary count as inside.
    fn is_inside_radius(&self, center: DVec3, radius: f64) -> bool;

    /// Checks whether every component is within `tolerance` of the other vector's.
    fn approx_eq(&self, other: DVec3, tolerance: f64) -> bool;
}

impl Vector for DVec3 {
    #[inline]
    fn magnitude(&self) -> f64 {
        self.length()
    }

    #[inline]
    fn magnitude_squared(&self) -> f64 {
        self.length_squared()
    }

    fn normalise(&mut self) -> Result<f64, VectorError> {
        let length = self.length();

        if length == 0.0 || !length.is_finite() {
            return Err(VectorError::ZeroLength);
        }

        *self /= length;
        Ok(length)
    }

    fn normalised(mut self) -> Result<Self, VectorError> {
        self.normalise()?;
        Ok(self)
    }

    fn rotate_around(&mut self, axis: DVec3, theta: f64) -> Result<&mut Self, VectorError> {
        let axis = axis.normalised()?;
        let mut unit = *self;
        let length = unit.normalise()?;

        *self = rotate_about_unit_axis(unit, axis, theta) * length;
        Ok(self)
    }

    fn rotated_around(mut self, axis: DVec3, theta: f64) -> Result<Self, VectorError> {
        self.rotate_around(axis, theta)?;
        Ok(self)
    }

    fn rotate_with_matrix(&mut self, axis: DVec3, theta: f64) -> Result<&mut Self, VectorError> {
        let axis = axis.normalised()?;
        let mut unit = *self;
        let length = unit.normalise()?;

        *self = rotation_matrix(axis, theta) * unit * length;
        Ok(self)
    }

    fn rotate_about_z(&mut self, theta: f64) -> &mut Self {
        let (s, c) = theta.sin_cos();
        let (x, y) = (self.x, self.y);

        self.x = x * c - y * s;
        self.y = x * s + y * c;
        self
    }

    fn rotate_about_x(&mut self, theta: f64) -> &mut Self {
        let (s, c) = theta.sin_cos();
        let (y, z) = (self.y, self.z);

        self.y = y * c - z * s;
        self.z = y * s + z * c;
        self
    }

    fn angle_with(&self, other: DVec3) -> Result<f64, VectorError> {
        let denominator = self.length() * other.length();

        if denominator == 0.0 {
            return Err(VectorError::ZeroLength);
        }

        Ok((self.dot(other) / denominator).clamp(-1.0, 1.0).acos())
    }

    #[inline]
    fn longitude(&self) -> f64 {
        self.y.atan2(self.x)
    }

    fn angle_of_line_to(&self, other: DVec3) -> Result<f64, VectorError> {
        if self.z != 0.0 || other.z != 0.0 {
            return Err(VectorError::NotPlanar);
        }

        Ok((other.y - self.y).atan2(other.x - self.x))
    }

    fn is_inside_radius(&self, center: DVec3, radius: f64) -> bool {
        self.distance_squared(center) <= radius * radius
    }

    fn approx_eq(&self, other: DVec3, tolerance: f64) -> bool {
        self.abs_diff_eq(other, tolerance)
    }
}

/// Builds the matrix that rotates vectors by `theta` radians around `axis`.
///
/// The axis is expected to be a unit vector; no normalisation happens here.
///
/// # Example
/// ```
/// use glam::DVec3;
/// use astrarium::rotation_matrix;
///
/// let matrix = rotation_matrix(DVec3::Z, std::f64::consts::PI);
/// let rotated = matrix * DVec3::X;
///
/// assert!((rotated - DVec3::NEG_X).length() < 1e-12);
/// ```
pub fn rotation_matrix(axis: DVec3, theta: f64) -> DMat3 {
    let (s, c) = theta.sin_cos();
    let t = 1.0 - c;
    let DVec3 { x, y, z } = axis;

    let xy = x * y;
    let xz = x * z;
    let yz = y * z;

    let row_1 = DVec3::new(c + x * x * t, xy * t - z * s, xz * t + y * s);
    let row_2 = DVec3::new(xy * t + z * s, c + y * y * t, yz * t - x * s);
    let row_3 = DVec3::new(xz * t - y * s, yz * t + x * s, c + z * z * t);

    DMat3::from_cols(row_1, row_2, row_3).transpose()
}

/// Rotates `v` around an axis that is already known to be a unit vector.
///
/// Unlike [`Vector::rotate_around`], this never normalises and works for vectors of
/// any length, including zero.
pub(crate) fn rotate_about_unit_axis(v: DVec3, axis: DVec3, theta: f64) -> DVec3 {
    let (s, c) = theta.sin_cos();
    let t = 1.0 - c;
    let DVec3 { x: ax, y: ay, z: az } = axis;
    let DVec3 { x, y, z } = v;

    DVec3::new(
        x * (t * ax * ax + c) + y * (t * ax * ay - s * az) + z * (t * ax * az + s * ay),
        x * (t * ax * ay + s * az) + y * (t * ay * ay + c) + z * (t * ay * az - s * ax),
        x * (t * ax * az - s * ay) + y * (t * ay * az + s * ax) + z * (t * az * az + c),
    )
}
