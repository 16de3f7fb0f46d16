//! Binding generator for the frontends, Kotlin unless a `--swift-*` flag is passed
//!
//! ```text
//! cargo run -p uniffi-bindgen -- generate --library <libsimple_nfc.so> \
//!     --language kotlin --out-dir <dir>
//! cargo run -p uniffi-bindgen -- <libsimple_nfc.a> <dir> --swift-sources --headers --modulemap
//! ```

fn main() {
    let wants_swift = std::env::args().skip(1).any(|arg| arg.starts_with("--swift"));

    match wants_swift {
        true => uniffi::uniffi_bindgen_swift(),
        false => uniffi::uniffi_bindgen_main(),
    }
}
