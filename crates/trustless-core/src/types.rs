//! Domain and wire types for orders and authenticated requests.

pub mod market;
pub mod order;

pub use market::*;
pub use order::*;
