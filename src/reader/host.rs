//! What the rust side needs from the platform to read tags

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum RegistrationError {
    /// The platform refused, ex. the screen was not in the foreground
    #[error("invalid state for foreground dispatch: {0}")]
    InvalidState(String),

    #[error("unexpected error from the host: {0}")]
    Unexpected(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for RegistrationError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Unexpected(error.reason)
    }
}

#[uniffi::export(callback_interface)]
pub trait NfcHost: Send + Sync + std::fmt::Debug + 'static {
    /// The device has NFC hardware
    fn is_nfc_available(&self) -> bool;

    /// NFC is switched on in the system settings
    fn is_nfc_enabled(&self) -> bool;

    /// Route discovered tags to the foreground screen
    fn enable_foreground_dispatch(&self) -> Result<(), RegistrationError>;

    fn disable_foreground_dispatch(&self) -> Result<(), RegistrationError>;

    /// Transient notification, ex. a toast
    fn show_notification(&self, message: String);

    /// Ask the user to switch NFC on, ex. a dialog linking to the NFC settings
    fn prompt_enable_nfc(&self);

    /// Close the screen, tag reading is not possible
    fn close_surface(&self);
}
