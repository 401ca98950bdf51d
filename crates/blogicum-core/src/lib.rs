//! # Blogicum Core
//!
//! The domain layer of the blog.
//! Entities, validation rules, the visibility predicate and the services
//! that the web layer drives. No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
