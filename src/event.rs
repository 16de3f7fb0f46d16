//! Tag discovery events that the frontend forwards to the rust app

/// Platform action that came with a discovered tag
#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    Eq,
    PartialEq,
    Default,
    strum::EnumString,
    strum::IntoStaticStr,
    uniffi::Enum,
)]
pub enum DiscoveryKind {
    #[strum(serialize = "android.nfc.action.NDEF_DISCOVERED")]
    NdefDiscovered,

    #[strum(serialize = "android.nfc.action.TECH_DISCOVERED")]
    TechDiscovered,

    #[strum(serialize = "android.nfc.action.TAG_DISCOVERED")]
    TagDiscovered,

    #[default]
    #[strum(disabled)]
    Other,
}

impl DiscoveryKind {
    /// Map a platform action string, anything unknown (including a plain launch) is `Other`
    pub fn from_action(action: &str) -> Self {
        action.parse().unwrap_or_default()
    }
}

/// One tag detection, carries the raw NDEF messages read from the tag
///
/// Created by the platform when a tag is detected, consumed once
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct DiscoveryEvent {
    pub kind: DiscoveryKind,
    pub messages: Vec<Vec<u8>>,
}

impl DiscoveryEvent {
    pub fn new(kind: DiscoveryKind, messages: Vec<Vec<u8>>) -> Self {
        Self { kind, messages }
    }

    pub fn ndef(messages: Vec<Vec<u8>>) -> Self {
        Self::new(DiscoveryKind::NdefDiscovered, messages)
    }

    pub fn first_message(&self) -> Option<&[u8]> {
        self.messages.first().map(Vec::as_slice)
    }
}

#[uniffi::export]
fn discovery_kind_from_action(action: String) -> DiscoveryKind {
    DiscoveryKind::from_action(&action)
}

#[uniffi::export]
fn discovery_kind_to_action(kind: DiscoveryKind) -> Option<String> {
    match kind {
        DiscoveryKind::Other => None,
        kind => {
            let action: &'static str = kind.into();
            Some(action.to_string())
        }
    }
}
