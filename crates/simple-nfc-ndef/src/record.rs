use crate::{header::NdefHeader, payload::NdefPayload, type_name_format::TypeNameFormat};

/// Record type of a well known text record
pub const TEXT_RECORD_TYPE: &[u8] = b"T";

/// External record type used by Android application records (AAR)
pub const ANDROID_APPLICATION_RECORD_TYPE: &[u8] = b"android.com:pkg";

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NdefRecord {
    pub header: NdefHeader,
    pub type_: Vec<u8>,
    pub id: Option<Vec<u8>>,
    pub payload: NdefPayload,
}

impl NdefRecord {
    pub fn type_name_format(&self) -> TypeNameFormat {
        self.header.type_name_format
    }

    /// The text of a well known text record
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            NdefPayload::Text(text) => Some(&text.text),
            NdefPayload::Data(_) => None,
        }
    }

    /// The package name carried by an Android application record
    pub fn android_package(&self) -> Option<String> {
        if self.type_name_format() != TypeNameFormat::External
            || self.type_ != ANDROID_APPLICATION_RECORD_TYPE
        {
            return None;
        }

        match &self.payload {
            NdefPayload::Data(data) => String::from_utf8(data.clone()).ok(),
            NdefPayload::Text(_) => None,
        }
    }

    /// Printable form of the record type, hex encoded if it is not valid utf8
    pub fn type_name(&self) -> String {
        match std::str::from_utf8(&self.type_) {
            Ok(type_) => type_.to_string(),
            Err(_) => hex::encode(&self.type_),
        }
    }
}
