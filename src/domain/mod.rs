pub mod alert;
pub mod product;
pub mod warehouse;

pub use alert::*;
pub use product::*;
pub use warehouse::*;
