//! Layout model: node state and the forces acting on it.
//!
//! The simulation driver owns a [`ForceField`], an ordered collection of named
//! [`Force`]s. Every step each force reads the same node snapshot and adds its
//! velocity deltas into a shared buffer; the driver then integrates the summed
//! deltas. Forces never see each other's contributions within a step.

mod field;
mod force;
mod node;
mod scale;

pub use field::ForceField;
pub use force::{
    CenterBandForce, CollisionForce, Force, ForceContext, GlobalCenterForce, GroupAxisForce,
    RepulsionFalloff, RepulsionForce,
};
pub use node::Node;
pub use scale::OrdinalScale;
