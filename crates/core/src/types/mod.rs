//! Shared domain types.

pub mod cart;
pub mod id;
pub mod money;

pub use cart::Cart;
pub use id::ProductId;
