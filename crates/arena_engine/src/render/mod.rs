//! Boundary to the rendering collaborator
//!
//! The simulation never reads GPU state back; it only pushes transforms.

use crate::foundation::math::{Transform, Vec3};

/// Receiver for per-entity model transforms
pub trait ModelSink {
    /// Set the world translation of model `model_id`
    fn set_translate(&mut self, model_id: u64, translation: Vec3);

    /// Set the Euler rotation (radians) of model `model_id`
    fn set_rotate(&mut self, model_id: u64, rotation: Vec3);

    /// Push a full transform
    fn set_transform(&mut self, model_id: u64, transform: &Transform) {
        self.set_translate(model_id, transform.position);
        self.set_rotate(model_id, transform.rotation);
    }
}

/// Sink that records the last transform per model, for headless runs and tests
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    /// Last pushed transform per model id
    pub transforms: std::collections::BTreeMap<u64, Transform>,
}

impl ModelSink for RecordingSink {
    fn set_translate(&mut self, model_id: u64, translation: Vec3) {
        self.transforms.entry(model_id).or_default().position = translation;
    }

    fn set_rotate(&mut self, model_id: u64, rotation: Vec3) {
        self.transforms.entry(model_id).or_default().rotation = rotation;
    }
}
