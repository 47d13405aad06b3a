mod ais;
mod encounter;

pub use ais::*;
pub use encounter::*;
