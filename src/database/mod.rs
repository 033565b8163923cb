pub mod import;
pub mod source;
pub mod store;

pub use import::*;
pub use source::*;
pub use store::*;
