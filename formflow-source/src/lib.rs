//! Source providers — configured pull/push endpoints.
//!
//! A provider is the system's extensibility axis: each remote-system kind
//! implements [`SourceProvider`] once, and composition logic depends only on
//! the trait, never on concrete variant identity. Adding a new remote kind
//! means adding a module here and a [`config::SourceConfig`] variant; the
//! composer is untouched.
//!
//! Providers are immutable with respect to endpoint identity:
//! reconfiguration replaces the instance, it never mutates one in place.

pub mod aggregate;
pub mod central;
pub mod collect;
pub mod config;
pub mod error;

use formflow_core::{FormDescriptor, SharedConfig};

pub use aggregate::AggregateSource;
pub use central::CentralSource;
pub use collect::CollectDirSource;
pub use config::{Credentials, SourceConfig};
pub use error::SourceError;

/// Invocation prefix for every generated command line.
pub const RUNTIME_INVOCATION: &str = "java -jar briefcase.jar";

/// Contract every remote-system kind implements once.
pub trait SourceProvider {
    /// Stable machine-readable kind tag (`aggregate`, `central`, …).
    fn kind(&self) -> &'static str;

    /// One-line human description of the configured endpoint, without
    /// credentials.
    fn description(&self) -> String;

    /// Enumerate the forms available at the endpoint (or from a local
    /// override). Failure is [`SourceError::EndpointUnavailable`]; it is
    /// surfaced to the caller, never retried here.
    fn form_list(&self) -> Result<Vec<FormDescriptor>, SourceError>;

    /// Command fragments the generated script runs to pull data.
    ///
    /// Stable and order-preserving relative to `selected`'s iteration
    /// order. Callers validate `shared` before asking for command lines.
    fn pull_command_lines(
        &self,
        selected: &[FormDescriptor],
        shared: &SharedConfig,
    ) -> Vec<String>;

    /// Symmetric contract for the push phase.
    fn push_command_lines(
        &self,
        selected: &[FormDescriptor],
        shared: &SharedConfig,
    ) -> Vec<String>;

    /// The serializable configuration record this provider was built from.
    fn config(&self) -> SourceConfig;
}
