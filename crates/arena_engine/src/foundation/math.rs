//! Math utilities and types
//!
//! Provides the fundamental math types used by the simulation and collision code.

pub use nalgebra::{Matrix3, Rotation3, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// Transform representing position, rotation, and scale
///
/// Rotation is stored as Euler angles (pitch, yaw, roll) in radians because that is
/// what the model collaborators consume through `set_rotate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Euler rotation in radians (x = pitch, y = yaw, z = roll)
    pub rotation: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Yaw component of the rotation
    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }

    /// Rotation matrix whose columns are the local X, Y, Z axes in world space
    pub fn rotation_matrix(&self) -> Mat3 {
        // nalgebra takes the angles about X, Y, Z in that order
        *Rotation3::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z).matrix()
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Wrap an angle into [-PI, PI]
    pub fn wrap_angle(angle: f32) -> f32 {
        (angle + constants::PI).rem_euclid(constants::TAU) - constants::PI
    }

    /// Rotate `current` toward `target` along the shortest arc, at most `max_step` radians
    pub fn rotate_toward(current: f32, target: f32, max_step: f32) -> f32 {
        let diff = wrap_angle(target - current);
        if diff.abs() <= max_step {
            wrap_angle(target)
        } else {
            wrap_angle(current + max_step.copysign(diff))
        }
    }

    /// Unit forward vector on the XZ plane for a yaw angle (yaw 0 faces +Z)
    pub fn forward_from_yaw(yaw: f32) -> Vec3 {
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Yaw that faces along `direction` on the XZ plane
    pub fn yaw_from_direction(direction: Vec3) -> f32 {
        direction.x.atan2(direction.z)
    }

    /// Horizontal (XZ) component of a vector
    pub fn flatten(v: Vec3) -> Vec3 {
        Vec3::new(v.x, 0.0, v.z)
    }
}
