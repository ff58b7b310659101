use serde::{Deserialize, Serialize};

use crate::error::EnrichmentError;

/// One hostname/IP pair reported by blacksheepwall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub hostname: String,
    #[serde(rename = "ip")]
    pub ip_address: String,
    /// Which blacksheepwall task produced the pair (e.g. "Certificate Search").
    #[serde(rename = "src", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Parse the tool's `-json` output.
///
/// blacksheepwall prints `null` instead of `[]` when it found nothing, so that
/// is accepted as zero records. Anything else that is not an array of objects
/// carrying string `hostname` and `ip` fields is rejected.
pub fn parse_records(stdout: &[u8]) -> Result<Vec<EnrichmentRecord>, EnrichmentError> {
    let records: Option<Vec<EnrichmentRecord>> = serde_json::from_slice(stdout)?;
    Ok(records.unwrap_or_default())
}
