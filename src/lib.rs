pub mod adapter;
pub mod config;
pub mod error;
pub mod external;
pub mod host;
pub mod output;
pub mod record;

// re-export the types a host needs to drive a run
pub use crate::adapter::{DomainEnrichmentAdapter, EnrichmentRequest, EnrichmentSummary};
pub use crate::error::EnrichmentError;
pub use crate::host::{Host, MemoryHost};
pub use crate::record::EnrichmentRecord;
