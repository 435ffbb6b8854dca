//! Per-attacker record of colliders already hit
//!
//! Collision checks run every frame, so a swing or bullet that keeps overlapping
//! a target would otherwise deal damage once per frame. The owner adds the
//! target's collider id on the first hit and checks it before every later one.

use std::collections::HashSet;

/// Set of collider ids hit during the current attack window
#[derive(Debug, Clone, Default)]
pub struct ContactRecord {
    hit_ids: HashSet<u32>,
}

impl ContactRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit; adding an id twice is harmless
    pub fn add(&mut self, id: u32) {
        self.hit_ids.insert(id);
    }

    /// Whether `id` has already been hit
    pub fn check(&self, id: u32) -> bool {
        self.hit_ids.contains(&id)
    }

    /// Forget every hit (end of attack window, or owner destroyed)
    pub fn clear(&mut self) {
        self.hit_ids.clear();
    }

    /// Number of distinct ids recorded
    pub fn len(&self) -> usize {
        self.hit_ids.len()
    }

    /// Whether nothing has been hit yet
    pub fn is_empty(&self) -> bool {
        self.hit_ids.is_empty()
    }
}
