mod wavefront;

pub use wavefront::{ParseWavefront, ReadWavefront, DEFAULT_OBJECT_NAME};
