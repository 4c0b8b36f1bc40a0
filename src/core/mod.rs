pub mod error;
pub mod field;
pub mod record;

pub use error::*;
pub use field::*;
pub use record::*;
