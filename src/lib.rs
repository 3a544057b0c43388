pub use ::tabula_core::*;
pub use ::tabula_macros::Entity;
