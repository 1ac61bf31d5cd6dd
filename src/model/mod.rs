//! Pure data structures shared by the producer, the dispatcher and the store.

pub mod product;

pub use product::*;
