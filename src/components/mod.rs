//! Page components and shared browser behaviors.

pub mod effects;
pub mod network_graph;
pub mod waitlist;
