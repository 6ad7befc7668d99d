pub mod error;
pub mod model;
pub mod traits;

pub use self::error::*;
pub use self::model::*;
pub use self::traits::*;
