//! Authentication
//!
//! Bearer API tokens resolve to exactly one user. Only a SHA-256 verifier of
//! the token material is stored.

mod errors;
mod models;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use repository::PgAuthRepository;
pub use service::*;
pub use token::*;
