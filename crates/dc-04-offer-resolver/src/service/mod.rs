//! Service Layer
//!
//! Application services orchestrating the domain and the outbound ports.

pub mod resolver;

pub use resolver::ContractOfferResolver;
