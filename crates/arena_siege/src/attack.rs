//! Melee attack timeline
//!
//! An attack runs three phases back to back: windup (arm raises), swing (arm
//! comes down to the hit angle) and recover (arm returns to idle). Damage is
//! dealt once per attack, when the timeline reaches the swing phase.

use arena_engine::foundation::math::utils::lerp;
use serde::{Deserialize, Serialize};

/// How the single damage application is detected
///
/// `InstantWindow` only strikes on a frame whose elapsed time lies inside
/// `[windup, windup + swing)`. A frame long enough to jump over the whole swing
/// misses the strike. `CrossedSwingStart` strikes on the first frame at or past
/// `windup`, so the hit cannot be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SwingHitPolicy {
    /// Strike only while inside the swing window
    #[default]
    InstantWindow,
    /// Strike once the swing start has been crossed
    CrossedSwingStart,
}

/// Durations and arm angles of a melee attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackTiming {
    /// Windup duration (seconds)
    pub windup: f32,
    /// Swing duration (seconds)
    pub swing: f32,
    /// Recover duration (seconds)
    pub recover: f32,
    /// Arm angle at the top of the windup (radians)
    pub raise_angle: f32,
    /// Arm angle at the end of the swing (radians)
    pub hit_angle: f32,
    /// Resting arm angle (radians)
    pub idle_angle: f32,
}

impl Default for AttackTiming {
    fn default() -> Self {
        Self {
            windup: 0.35,
            swing: 0.12,
            recover: 0.4,
            raise_angle: -1.6,
            hit_angle: 0.9,
            idle_angle: 0.0,
        }
    }
}

impl AttackTiming {
    /// Total attack length
    pub fn total(&self) -> f32 {
        self.windup + self.swing + self.recover
    }

    /// Whether `t` lies in `[windup, windup + swing)`
    pub fn in_swing_window(&self, t: f32) -> bool {
        t >= self.windup && t < self.windup + self.swing
    }

    /// Arm angle at time `t` since the attack started
    pub fn arm_angle(&self, t: f32) -> f32 {
        let phase = |elapsed: f32, duration: f32| {
            if duration > 0.0 {
                (elapsed / duration).clamp(0.0, 1.0)
            } else {
                1.0
            }
        };

        if t < self.windup {
            lerp(self.idle_angle, self.raise_angle, phase(t, self.windup))
        } else if t < self.windup + self.swing {
            lerp(self.raise_angle, self.hit_angle, phase(t - self.windup, self.swing))
        } else {
            lerp(
                self.hit_angle,
                self.idle_angle,
                phase(t - self.windup - self.swing, self.recover),
            )
        }
    }
}

/// Result of advancing an attack by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackTick {
    /// Arm angle to display this frame
    pub arm_angle: f32,
    /// Elapsed time is inside the swing window
    pub in_swing: bool,
    /// Apply the attack's damage this frame
    pub strike_now: bool,
    /// The whole timeline has elapsed
    pub finished: bool,
}

/// Running attack: elapsed time and the once-per-attack hit flag
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttackClock {
    elapsed: f32,
    did_hit_this_attack: bool,
}

impl AttackClock {
    /// Restart the timeline and clear the hit flag
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.did_hit_this_attack = false;
    }

    /// Seconds since the attack started
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Whether this attack has already struck
    pub fn did_hit(&self) -> bool {
        self.did_hit_this_attack
    }

    /// Clear the hit flag without touching the timeline
    pub fn clear_hit(&mut self) {
        self.did_hit_this_attack = false;
    }

    /// Advance by `dt` and report what happens this frame
    pub fn advance(&mut self, dt: f32, timing: &AttackTiming, policy: SwingHitPolicy) -> AttackTick {
        self.elapsed += dt;
        let t = self.elapsed;
        let in_swing = timing.in_swing_window(t);

        let reached_swing = match policy {
            SwingHitPolicy::InstantWindow => in_swing,
            SwingHitPolicy::CrossedSwingStart => t >= timing.windup,
        };
        let strike_now = reached_swing && !self.did_hit_this_attack;
        if strike_now {
            self.did_hit_this_attack = true;
        }

        AttackTick {
            arm_angle: timing.arm_angle(t),
            in_swing,
            strike_now,
            finished: t >= timing.total(),
        }
    }
}
