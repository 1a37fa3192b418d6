//! # Gantry Session Storage
//!
//! Session persistence for the Gantry server.
//!
//! Provides the [`SessionStore`] trait together with the session payload type
//! shared by all backends, plus an in-memory backend for development mode.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod memory;
pub mod store;

use rand::{rngs::OsRng, RngCore};

pub use error::SessionError;
pub use memory::MemoryStore;
pub use store::{SessionData, SessionId, SessionStore, USER_ID_KEY};

/// Generates a new random session identifier.
///
/// 128 bits from the operating system CSPRNG, hex encoded.
pub fn generate_session_id() -> SessionId {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex_encode(&bytes)
}

/// Encodes bytes as lowercase hexadecimal.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        hex.push(HEX_CHARS[(byte >> 4) as usize] as char);
        hex.push(HEX_CHARS[(byte & 0x0F) as usize] as char);
    }
    hex
}
