//! The controller-facing provider contract and its SolidDNS implementation.

mod soliddns;

// Re-exports for convenience
pub use self::soliddns::{
    HttpSolidDnsApi, ResourceRecord, SolidDnsApi, SolidDnsProvider, ZoneAuth,
    PTR_RECORD_PROPERTY,
};

use thiserror::Error;

use crate::endpoint::{Changes, Endpoint};

/// Error returned by provider and appliance operations.
///
/// TTL parse failures on the read path are deliberately not represented here;
/// they degrade to a default value with a logged warning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Transport-level failure reaching the appliance.
    #[error("API request failed: {0}")]
    UpstreamUnavailable(String),
    /// The appliance answered, but with an error status or failure flag.
    #[error("API request rejected: {0}")]
    UpstreamRejected(String),
    /// The caller handed us something unusable, e.g. an endpoint without targets.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Wraps another error with zone/record context.
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<ProviderError>,
    },
}

impl ProviderError {
    /// Wrap this error with additional context, e.g. the affected zone or record.
    pub fn context(self, context: impl Into<String>) -> Self {
        ProviderError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Walk context wrappers down to the underlying error kind.
    pub fn root_cause(&self) -> &ProviderError {
        match self {
            ProviderError::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// The narrow contract the external-dns controller drives a provider through.
pub trait Provider {
    /// All endpoints across the zones matching the domain filter.
    fn records(&self) -> Result<Vec<Endpoint>, ProviderError>;
    /// Appliance zones matching the domain filter, in appliance order.
    fn zones(&self) -> Result<Vec<ZoneAuth>, ProviderError>;
    /// Apply a four-way change batch. Deletions are processed before
    /// creations; the first failure aborts the rest of the batch.
    fn apply_changes(&self, changes: &Changes) -> Result<(), ProviderError>;
    /// Normalize endpoints before the controller diffs them against [`Provider::records`].
    fn adjust_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<Vec<Endpoint>, ProviderError>;
}
