//! lfv-diagrams: vertex and topology catalogs
//!
//! Typed coupling vertices and the triangle/bubble diagram skeletons that
//! map them onto loop-function combinations. Everything here is symbolic;
//! topologies validate their vertex assignments at construction and fail
//! fast on arity or role mismatches.

pub mod topology;
pub mod vertex;

pub use topology::{
    loop_factor, Bubble, BubbleKind, ChiralPair, Kinematics, Triangle, TriangleKind,
};
pub use vertex::{Vertex, VertexRole};
