//! Fakes and fixtures shared by the unit tests

use std::sync::Arc;

use parking_lot::Mutex;
use simple_nfc_ndef::record::ANDROID_APPLICATION_RECORD_TYPE;

use crate::{
    reader::host::{NfcHost, RegistrationError},
    tag_state::TagStateObserver,
};

#[derive(Debug, Clone)]
pub struct RecordSpec {
    type_name_format: u8,
    type_: Vec<u8>,
    payload: Vec<u8>,
}

pub fn text_record(language: &str, text: &str) -> RecordSpec {
    let mut payload = vec![language.len() as u8];
    payload.extend_from_slice(language.as_bytes());
    payload.extend_from_slice(text.as_bytes());

    RecordSpec { type_name_format: 0x01, type_: b"T".to_vec(), payload }
}

pub fn aar_record(package: &str) -> RecordSpec {
    RecordSpec {
        type_name_format: 0x04,
        type_: ANDROID_APPLICATION_RECORD_TYPE.to_vec(),
        payload: package.as_bytes().to_vec(),
    }
}

/// Encodes records into one NDEF message, short records where the payload fits
#[derive(Debug, Default)]
pub struct MessageBuilder {
    records: Vec<RecordSpec>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(mut self, record: RecordSpec) -> Self {
        self.records.push(record);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let last = self.records.len().saturating_sub(1);
        let mut bytes = Vec::new();

        for (index, record) in self.records.into_iter().enumerate() {
            let short_record = record.payload.len() <= u8::MAX as usize;

            let mut header = record.type_name_format;
            if index == 0 {
                header |= 0x80;
            }
            if index == last {
                header |= 0x40;
            }
            if short_record {
                header |= 0x10;
            }

            bytes.push(header);
            bytes.push(record.type_.len() as u8);

            if short_record {
                bytes.push(record.payload.len() as u8);
            } else {
                bytes.extend_from_slice(&(record.payload.len() as u32).to_be_bytes());
            }

            bytes.extend_from_slice(&record.type_);
            bytes.extend_from_slice(&record.payload);
        }

        bytes
    }
}

/// Single text record message
pub fn text_message(text: &str) -> Vec<u8> {
    MessageBuilder::new().record(text_record("en", text)).build()
}

#[derive(Debug, Clone, Default)]
pub struct RecordingObserver(Arc<Mutex<Vec<String>>>);

impl RecordingObserver {
    pub fn values(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

impl TagStateObserver for RecordingObserver {
    fn on_tag_data(&self, data: String) {
        self.0.lock().push(data);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    EnableDispatch,
    DisableDispatch,
    Notification(String),
    PromptEnable,
    CloseSurface,
}

#[derive(Debug)]
struct FakeHostInner {
    available: bool,
    enabled: bool,
    fail_enable: Mutex<bool>,
    fail_disable: Mutex<bool>,
    calls: Mutex<Vec<HostCall>>,
}

/// Host that records every call, clones share the same record
#[derive(Debug, Clone)]
pub struct FakeHost(Arc<FakeHostInner>);

impl FakeHost {
    pub fn new() -> Self {
        Self::with_adapter(true, true)
    }

    pub fn with_adapter(available: bool, enabled: bool) -> Self {
        Self(Arc::new(FakeHostInner {
            available,
            enabled,
            fail_enable: Mutex::new(false),
            fail_disable: Mutex::new(false),
            calls: Mutex::new(vec![]),
        }))
    }

    pub fn fail_enable(&self, fail: bool) {
        *self.0.fail_enable.lock() = fail;
    }

    pub fn fail_disable(&self, fail: bool) {
        *self.0.fail_disable.lock() = fail;
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.0.calls.lock().clone()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Notification(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: HostCall) {
        self.0.calls.lock().push(call);
    }
}

impl NfcHost for FakeHost {
    fn is_nfc_available(&self) -> bool {
        self.0.available
    }

    fn is_nfc_enabled(&self) -> bool {
        self.0.enabled
    }

    fn enable_foreground_dispatch(&self) -> Result<(), RegistrationError> {
        self.record(HostCall::EnableDispatch);
        match *self.0.fail_enable.lock() {
            true => Err(RegistrationError::InvalidState("activity is not resumed".into())),
            false => Ok(()),
        }
    }

    fn disable_foreground_dispatch(&self) -> Result<(), RegistrationError> {
        self.record(HostCall::DisableDispatch);
        match *self.0.fail_disable.lock() {
            true => Err(RegistrationError::InvalidState("activity is not resumed".into())),
            false => Ok(()),
        }
    }

    fn show_notification(&self, message: String) {
        self.record(HostCall::Notification(message));
    }

    fn prompt_enable_nfc(&self) {
        self.record(HostCall::PromptEnable);
    }

    fn close_surface(&self) {
        self.record(HostCall::CloseSurface);
    }
}
