mod bind;
mod decode;
mod encoding;
mod hydrate;
mod large_object;

pub use bind::*;
pub use decode::*;
pub use encoding::*;
pub use hydrate::*;
pub use large_object::*;
