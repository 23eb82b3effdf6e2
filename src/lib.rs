#[allow(non_snake_case)]
pub mod BoundaryLayer;
pub mod cli;
