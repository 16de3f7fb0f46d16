//! Decode the JSON text stored in a tag's text record
//!
//! Expected text, exactly as written to the tags: `{"ID": <integer>, "command": "<string>"}`

use derive_more::Display;
use serde::Deserialize as _;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct DecodedTag {
    pub id: i32,
    pub command: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, uniffi::Enum)]
pub enum TagField {
    #[display("ID")]
    Id,
    #[display("command")]
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum DecodeError {
    #[error("tag text is not a JSON object: {0}")]
    StructureInvalid(String),

    #[error("tag field {field} is missing or invalid: {reason}")]
    FieldMissingOrInvalid { field: TagField, reason: String },
}

pub type Error = DecodeError;
type Result<T, E = Error> = std::result::Result<T, E>;

impl DecodedTag {
    /// Text shown on screen, the spacing is relied on by existing consumers
    pub fn display(&self) -> String {
        format!("ID: {} , command: {}", self.id, self.command)
    }

    /// Text for the transient notification shown after a successful read
    pub fn notification(&self) -> String {
        format!("NFC Card: ID {}, command {}", self.id, self.command)
    }
}

/// Decode the text of a text record, both fields are required
pub fn decode(text: &str) -> Result<DecodedTag> {
    let value: Value = serde_json::from_str(text)
        .map_err(|error| DecodeError::StructureInvalid(error.to_string()))?;

    let Value::Object(object) = value else {
        return Err(DecodeError::StructureInvalid("expected a JSON object".into()));
    };

    let id = match object.get("ID") {
        Some(id) => i32::deserialize(id).map_err(|error| invalid(TagField::Id, error))?,
        None => return Err(missing(TagField::Id)),
    };

    let command = match object.get("command") {
        Some(Value::String(command)) => command.clone(),
        Some(other) => {
            return Err(invalid(TagField::Command, format!("expected a string, got {other}")));
        }
        None => return Err(missing(TagField::Command)),
    };

    Ok(DecodedTag { id, command })
}

fn missing(field: TagField) -> DecodeError {
    DecodeError::FieldMissingOrInvalid { field, reason: "missing".into() }
}

fn invalid(field: TagField, reason: impl ToString) -> DecodeError {
    DecodeError::FieldMissingOrInvalid { field, reason: reason.to_string() }
}

#[uniffi::export]
fn decode_tag_text(text: String) -> Result<DecodedTag> {
    decode(&text)
}

#[uniffi::export]
fn decoded_tag_display(tag: DecodedTag) -> String {
    tag.display()
}
