//! Marketplace API client and types.
//!
//! The client serves every resource from in-memory repositories seeded
//! with fixture data, behind a simulated network round trip.

mod client;
mod error;
mod repository;
pub mod seed;
pub mod types;

pub use client::{paginate, ClientOptions, Repositories, SouqClient};
pub use error::{ApiError, ErrorKind, Result};
pub use repository::{Record, RecordFilter, Repository};
pub use types::{ListQuery, Page};
