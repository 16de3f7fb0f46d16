#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum NdefPayload {
    /// Well known text record (`T`)
    Text(TextPayload),
    /// Anything else, kept as raw bytes
    Data(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TextPayload {
    pub format: TextPayloadFormat,
    /// IANA language code, ex. `en`
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum TextPayloadFormat {
    Utf8,
    Utf16,
}

impl TextPayloadFormat {
    /// Decode the text bytes of a text record
    ///
    /// UTF-16 is big endian unless there is a byte order mark, invalid sequences are replaced
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).to_string(),
            Self::Utf16 => {
                let (little_endian, bytes) = match bytes {
                    [0xFF, 0xFE, rest @ ..] => (true, rest),
                    [0xFE, 0xFF, rest @ ..] => (false, rest),
                    _ => (false, bytes),
                };

                let units = bytes
                    .chunks_exact(2)
                    .map(|chunk| match little_endian {
                        true => u16::from_le_bytes([chunk[0], chunk[1]]),
                        false => u16::from_be_bytes([chunk[0], chunk[1]]),
                    })
                    .collect::<Vec<u16>>();

                String::from_utf16_lossy(&units)
            }
        }
    }
}
