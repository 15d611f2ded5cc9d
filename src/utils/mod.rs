//! Utility modules

pub mod error;

pub use error::{ConnectivityError, IntegrityError, ResolverError, Result};
