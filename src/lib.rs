//! PIE Atlas - layout, interpolation and playback engines for an
//! Indo-European prehistory atlas

pub mod core;
pub mod data;
pub mod map;
pub mod nav;
pub mod render;
pub mod schedule;
pub mod tree;
pub mod viewport;
