//! Resolved URI output

pub mod reporter;

pub use reporter::UriReporter;
