//! Turn a discovery event into the records the app cares about

use simple_nfc_ndef::{NdefError, NdefRecord, TypeNameFormat};
use tracing::{debug, info};

use crate::event::DiscoveryEvent;

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum TagRecord {
    /// Well known text record, carries the JSON payload
    Text { text: String },

    /// Android application record, names the app that should handle the tag
    Application { package_id: String },

    /// Any other record, ignored
    Other { type_name_format: TypeNameFormat, record_type: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum UnwrapError {
    #[error("malformed NDEF message: {0}")]
    MalformedMessage(String),
}

impl From<NdefError> for UnwrapError {
    fn from(error: NdefError) -> Self {
        Self::MalformedMessage(error.to_string())
    }
}

pub type Error = UnwrapError;
type Result<T, E = Error> = std::result::Result<T, E>;

impl From<NdefRecord> for TagRecord {
    fn from(record: NdefRecord) -> Self {
        if let Some(package_id) = record.android_package() {
            return Self::Application { package_id };
        }

        match record.text() {
            Some(text) => Self::Text { text: text.to_string() },
            None => Self::Other {
                type_name_format: record.type_name_format(),
                record_type: record.type_name(),
            },
        }
    }
}

/// Records of the first message in the event, in the order they were written
///
/// Any message after the first one is ignored
pub fn unwrap_event(event: &DiscoveryEvent) -> Result<Vec<TagRecord>> {
    let Some(message) = event.first_message() else {
        debug!("discovery event has no NDEF messages");
        return Ok(vec![]);
    };

    if event.messages.len() > 1 {
        debug!("ignoring {} NDEF messages after the first", event.messages.len() - 1);
    }

    let records = simple_nfc_ndef::parse_message(message)?
        .into_iter()
        .map(TagRecord::from)
        .inspect(|record| {
            if let TagRecord::Application { package_id } = record {
                info!("AAR is {package_id}");
            }
        })
        .collect();

    Ok(records)
}

#[uniffi::export]
fn unwrap_discovery_event(event: DiscoveryEvent) -> Result<Vec<TagRecord>> {
    unwrap_event(&event)
}
