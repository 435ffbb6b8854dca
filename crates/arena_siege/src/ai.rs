//! Commands produced by AI states
//!
//! A state's update never mutates its entity directly. It returns a list of
//! commands, and the entity applies them in order after the update returns.

use arena_engine::foundation::math::{utils, Vec3};

use crate::combat::Strike;

/// Effect requested by an AI state for this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiCommand<S> {
    /// Move by this displacement (before world collision)
    Move(Vec3),
    /// Set the body yaw
    Face(f32),
    /// Set the weapon arm angle
    SetArmAngle(f32),
    /// The state machine switched to this state
    TransitionTo(S),
    /// The entity becomes visible and collidable
    Activate,
    /// Apply a strike to the current target
    Strike(Strike),
    /// Enable or disable the melee strike volume
    SetStrikeVolume(bool),
    /// Start a burst of shots along this direction
    Fire(Vec3),
}

/// Yaw after turning toward `target_yaw` at `turn_rate` for `dt`
pub fn turn_toward(yaw: f32, target_yaw: f32, turn_rate: f32, dt: f32) -> f32 {
    utils::rotate_toward(yaw, target_yaw, turn_rate * dt)
}

/// Horizontal step toward `offset` that stops at `stop_distance`
///
/// Never overshoots and never retreats: when already closer than the stop
/// distance the step is zero.
pub fn approach_step(offset: Vec3, stop_distance: f32, max_step: f32) -> Vec3 {
    let flat = utils::flatten(offset);
    let distance = flat.norm();
    if distance <= f32::EPSILON {
        return Vec3::zeros();
    }
    let step = max_step.min((distance - stop_distance).max(0.0));
    flat * (step / distance)
}
