pub mod coeffs;
pub mod record;
pub mod row;

pub use coeffs::*;
pub use record::*;
pub use row::*;
