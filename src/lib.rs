pub mod config;
pub mod decoder;
pub mod event;
pub mod reader;
pub mod tag_state;
pub mod unwrapper;

pub(crate) mod logging;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::ReaderConfig;
pub use decoder::{DecodeError, DecodedTag, decode};
pub use event::{DiscoveryEvent, DiscoveryKind};
pub use reader::{BridgeState, ProcessOutcome, ReaderError, TagReader, host::NfcHost};
pub use tag_state::{TagState, TagStateObserver, TagSubscription};
pub use unwrapper::{TagRecord, UnwrapError, unwrap_event};

uniffi::setup_scaffolding!();
