pub mod export;
pub mod import;
pub mod query;
pub mod raster;
