pub mod error;
pub mod material;
pub mod phase;

pub use error::*;
pub use material::*;
pub use phase::*;
