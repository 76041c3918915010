pub mod drug;
pub mod medication;
pub mod warning;

pub use drug::*;
pub use medication::*;
pub use warning::*;
