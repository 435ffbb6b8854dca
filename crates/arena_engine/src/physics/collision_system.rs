//! Per-frame collision manager
//!
//! The scene rebuilds the registry every frame: `reset`, then `add_collider`
//! for every live collider, then `check_all_collisions`. Every registered pair
//! is tested (no broad phase); at the scale of tens of colliders the O(n²)
//! narrow phase is cheap enough.
//!
//! Registration copies the collider together with an owner tag chosen by the
//! caller, so the manager never borrows from entities. Handles carry the frame
//! they were issued in and stop resolving after the next `reset`.

use super::collider::{Collider, ColliderKind};
use super::collision_layers::CollisionLayers;

/// Frame-scoped reference to a registered collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle {
    frame: u64,
    index: u32,
}

impl ColliderHandle {
    /// Frame the handle was issued in
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// A collider registered for the current frame
#[derive(Debug, Clone, Copy)]
pub struct Registered<O> {
    /// Handle valid until the next reset
    pub handle: ColliderHandle,
    /// Caller-defined owner tag
    pub owner: O,
    /// Snapshot of the collider at registration time
    pub collider: Collider,
}

impl<O> Registered<O> {
    /// Serial id of the collider
    pub fn id(&self) -> u32 {
        self.collider.id()
    }

    /// Kind of the collider
    pub fn kind(&self) -> ColliderKind {
        self.collider.kind
    }
}

/// An overlapping pair found this frame, in registration order
#[derive(Debug, Clone, Copy)]
pub struct CollisionPair<O> {
    /// Registered earlier
    pub a: Registered<O>,
    /// Registered later
    pub b: Registered<O>,
}

impl<O: Copy> CollisionPair<O> {
    /// Both directed notifications: `(self, other)` for A then for B
    pub fn directed(&self) -> [(Registered<O>, Registered<O>); 2] {
        [(self.a, self.b), (self.b, self.a)]
    }
}

/// Registry of the colliders active this frame
#[derive(Debug)]
pub struct CollisionManager<O> {
    frame: u64,
    colliders: Vec<Registered<O>>,
}

impl<O> Default for CollisionManager<O> {
    fn default() -> Self {
        Self {
            frame: 0,
            colliders: Vec::new(),
        }
    }
}

impl<O: Copy> CollisionManager<O> {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the registry and invalidate every handle issued so far
    pub fn reset(&mut self) {
        self.colliders.clear();
        self.frame += 1;
    }

    /// Register a collider for this frame
    pub fn add_collider(&mut self, owner: O, collider: &Collider) -> ColliderHandle {
        let handle = ColliderHandle {
            frame: self.frame,
            index: u32::try_from(self.colliders.len()).unwrap_or(u32::MAX),
        };
        self.colliders.push(Registered {
            handle,
            owner,
            collider: *collider,
        });
        handle
    }

    /// Resolve a handle issued during the current frame
    pub fn get(&self, handle: ColliderHandle) -> Option<&Registered<O>> {
        if handle.frame != self.frame {
            return None;
        }
        self.colliders.get(handle.index as usize)
    }

    /// Test every unordered pair and return the overlapping ones
    ///
    /// The caller notifies both sides of each pair; see [`CollisionPair::directed`].
    pub fn check_all_collisions(&self) -> Vec<CollisionPair<O>> {
        let mut pairs = Vec::new();

        for (i, a) in self.colliders.iter().enumerate() {
            for b in &self.colliders[i + 1..] {
                if a.collider.id() == b.collider.id() {
                    continue;
                }
                if !CollisionLayers::should_collide(
                    a.collider.layer,
                    a.collider.mask,
                    b.collider.layer,
                    b.collider.mask,
                ) {
                    continue;
                }
                if a.collider.intersects(&b.collider) {
                    pairs.push(CollisionPair { a: *a, b: *b });
                }
            }
        }

        log::trace!(
            "frame {}: {} colliders, {} overlapping pairs",
            self.frame,
            self.colliders.len(),
            pairs.len()
        );
        pairs
    }

    /// Number of colliders registered this frame
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Current frame number
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Iterate over this frame's registrations
    pub fn iter(&self) -> impl Iterator<Item = &Registered<O>> {
        self.colliders.iter()
    }
}
