mod component;
mod render;
mod sim;
mod types;

pub use component::NetworkGraph;
