pub mod constants;
pub mod geometry;
pub mod transport;
