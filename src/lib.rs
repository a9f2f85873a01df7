pub mod error;
pub mod grid;
pub mod math;
pub mod mesh;
pub mod operations;

pub use error::{MeshmapError, Result};
