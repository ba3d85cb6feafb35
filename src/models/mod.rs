pub mod photo;
pub mod photo_set;

pub use photo::*;
pub use photo_set::*;
