//! Domain model: customers, movies, purchases and the pricing and loyalty
//! rules that connect them, plus the storage ports the application layer
//! depends on.

pub mod customer;
pub mod money;
pub mod movie;
pub mod ports;
pub mod pricing;
pub mod purchase;
