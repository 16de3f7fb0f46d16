//! TagReader, connects the platform's tag discovery to the decoding pipeline
//!
//! The frontend calls `activate` when the screen comes to the foreground and `deactivate` when it
//! leaves, discovered tags are only processed while active.

pub mod host;

use std::{cell::Cell, sync::Arc};

use parking_lot::ReentrantMutex;
use tap::TapFallible as _;
use tracing::{debug, error, info, warn};

use crate::{
    config::ReaderConfig,
    decoder::{self, DecodedTag},
    event::{DiscoveryEvent, DiscoveryKind},
    tag_state::TagState,
    unwrapper::{self, TagRecord},
};

use host::NfcHost;

pub const NFC_NOT_AVAILABLE: &str = "NFC is not available on this device";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum BridgeState {
    /// Not registered with the platform, discovered tags are dropped
    #[default]
    Inactive,

    /// Registered, receiving discovered tags
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum ProcessOutcome {
    /// The reader was inactive, nothing was read
    Dropped,

    /// Not an NDEF discovery
    Ignored,

    /// The first message could not be parsed
    Malformed { reason: String },

    /// Every decoded tag was published, in record order
    Processed { published: Vec<DecodedTag>, failed: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum ReaderError {
    #[error("NFC is not available on this device")]
    NoAdapter,
}

pub type Error = ReaderError;

#[derive(Debug, uniffi::Object)]
pub struct TagReader {
    host: Box<dyn NfcHost>,
    tag_state: Arc<TagState>,
    config: ReaderConfig,

    /// Held for the whole of every transition and every pipeline run, so they never overlap
    bridge: ReentrantMutex<Bridge>,
}

#[derive(Debug, Default)]
struct Bridge {
    state: Cell<BridgeState>,

    /// Bumped by every `deactivate`, a pipeline run stops once it changes
    generation: Cell<u64>,
}

#[uniffi::export]
impl TagReader {
    /// Fails if the device has no NFC hardware, the host is told to close the screen
    #[uniffi::constructor]
    pub fn try_new(
        host: Box<dyn NfcHost>,
        tag_state: Arc<TagState>,
        config: ReaderConfig,
    ) -> Result<Self, Error> {
        crate::logging::init(&config.log_filter);

        if !host.is_nfc_available() {
            error!("{NFC_NOT_AVAILABLE}");
            host.show_notification(NFC_NOT_AVAILABLE.to_string());
            host.close_surface();

            return Err(ReaderError::NoAdapter);
        }

        Ok(Self {
            host,
            tag_state,
            config,
            bridge: ReentrantMutex::new(Bridge::default()),
        })
    }

    /// Screen came to the foreground, register for discovered tags
    ///
    /// Does nothing if already active, on a failed registration the reader stays inactive
    #[uniffi::method]
    pub fn activate(&self) {
        let bridge = self.bridge.lock();

        if self.config.prompt_when_disabled && !self.host.is_nfc_enabled() {
            info!("NFC is switched off, asking the user to enable it");
            self.host.prompt_enable_nfc();
        }

        if bridge.state.get() == BridgeState::Active {
            debug!("already receiving discovered tags");
            return;
        }

        let registered = self
            .host
            .enable_foreground_dispatch()
            .tap_err(|error| error!("Error enabling NFC foreground dispatch: {error}"))
            .is_ok();

        if registered {
            debug!("NFC foreground dispatch enabled");
            bridge.state.set(BridgeState::Active);
        }
    }

    /// Screen left the foreground, once this returns nothing more is published
    ///
    /// Also stops a run already in progress further up the stack, ex. an observer deactivating
    /// from inside its callback, including a launch run while the reader was never active
    #[uniffi::method]
    pub fn deactivate(&self) {
        let bridge = self.bridge.lock();
        bridge.generation.set(bridge.generation.get().wrapping_add(1));

        if bridge.state.get() == BridgeState::Inactive {
            return;
        }

        let _ = self
            .host
            .disable_foreground_dispatch()
            .tap_err(|error| error!("Error disabling NFC foreground dispatch: {error}"));

        debug!("NFC foreground dispatch disabled");
        bridge.state.set(BridgeState::Inactive);
    }

    /// A tag was discovered while the screen is running
    #[uniffi::method]
    pub fn handle_discovery(&self, event: DiscoveryEvent) -> ProcessOutcome {
        info!("tag discovered: {:?}", event.kind);
        let bridge = self.bridge.lock();

        if bridge.state.get() == BridgeState::Inactive {
            warn!("reader is inactive, dropping discovered tag");
            return ProcessOutcome::Dropped;
        }

        if event.kind != DiscoveryKind::NdefDiscovered {
            debug!("ignoring {:?} discovery", event.kind);
            return ProcessOutcome::Ignored;
        }

        self.process(&bridge, &event)
    }

    /// The screen was started by a discovered tag, processed whether or not the reader is active
    #[uniffi::method]
    pub fn handle_launch(&self, event: DiscoveryEvent) -> ProcessOutcome {
        info!("launched with tag: {:?}", event.kind);
        let bridge = self.bridge.lock();

        self.process(&bridge, &event)
    }

    #[uniffi::method]
    pub fn state(&self) -> BridgeState {
        self.bridge.lock().state.get()
    }

    #[uniffi::method]
    pub fn is_active(&self) -> bool {
        self.state() == BridgeState::Active
    }

    #[uniffi::method]
    pub fn tag_state(&self) -> Arc<TagState> {
        self.tag_state.clone()
    }
}

impl TagReader {
    fn process(&self, bridge: &Bridge, event: &DiscoveryEvent) -> ProcessOutcome {
        let generation = bridge.generation.get();

        let records = match unwrapper::unwrap_event(event) {
            Ok(records) => records,
            Err(error) => {
                error!("Problem parsing message: {error}");
                return ProcessOutcome::Malformed { reason: error.to_string() };
            }
        };

        let mut published = Vec::new();
        let mut failed = 0;

        for record in records {
            if bridge.generation.get() != generation {
                debug!("reader deactivated, skipping the rest of the message");
                break;
            }

            let TagRecord::Text { text } = record else { continue };

            match decoder::decode(&text) {
                Ok(tag) => {
                    self.publish(bridge, generation, &tag);
                    published.push(tag);
                }
                Err(error) => {
                    error!("Error parsing the JSON data of the tag: {error}");
                    failed += 1;
                }
            }
        }

        ProcessOutcome::Processed { published, failed }
    }

    fn publish(&self, bridge: &Bridge, generation: u64, tag: &DecodedTag) {
        let data = tag.display();
        info!("tag data: {data}");

        self.tag_state.publish(data);

        // an observer deactivated the reader
        if bridge.generation.get() != generation {
            return;
        }

        if self.config.show_notifications {
            self.host.show_notification(tag.notification());
        }
    }
}
