//! Error types produced by the configuration registry and its layers.

mod aggregate;
mod constructors;
mod types;

pub use aggregate::AggregatedErrors;
pub use types::OnionError;

#[cfg(test)]
mod tests;
