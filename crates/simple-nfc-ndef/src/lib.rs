//! Parser for raw NDEF messages, as handed over by the platform when a tag is discovered

use tracing::{debug, warn};
use winnow::Parser as _;

uniffi::setup_scaffolding!();

pub mod header;
pub mod parser;
pub mod payload;
pub mod record;
pub mod type_name_format;

pub use header::NdefHeader;
pub use payload::{NdefPayload, TextPayload, TextPayloadFormat};
pub use record::NdefRecord;
pub use type_name_format::TypeNameFormat;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum NdefError {
    #[error("empty NDEF message, a message must contain at least one record")]
    Empty,

    #[error("error parsing the NDEF message: {0}")]
    Parse(String),
}

pub type Error = NdefError;
type Result<T, E = Error> = std::result::Result<T, E>;

/// Parse one complete NDEF message into its records, in the order they appear
///
/// Parsing stops at the first record with the message end flag set, any bytes after it are ignored
pub fn parse_message(data: &[u8]) -> Result<Vec<NdefRecord>> {
    if data.is_empty() {
        return Err(NdefError::Empty);
    }

    let mut stream = parser::stream(data);
    let records = parser::parse_ndef_records
        .parse_next(&mut stream)
        .map_err(|error| NdefError::Parse(error.to_string()))?;

    if !stream.is_empty() {
        warn!("ignoring {} trailing bytes after the last NDEF record", stream.len());
    }

    debug!("parsed {} NDEF records", records.len());
    Ok(records)
}

#[uniffi::export]
fn parse_ndef_message(data: Vec<u8>) -> Result<Vec<NdefRecord>> {
    parse_message(&data)
}
