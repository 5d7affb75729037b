//! Decryption applied to raw bytes before decoding.
//!
//! No algorithm ships with this crate; applications implement [`Cipher`] for
//! whatever envelope their secrets use.

use std::io::Read;

use crate::OnionResult;

/// Turns an encrypted stream into plain bytes.
pub trait Cipher: Send + Sync {
    /// Decrypt the whole of `input`.
    ///
    /// # Errors
    ///
    /// Returns an error, usually [`crate::OnionError::Decrypt`], when the input
    /// cannot be decrypted.
    fn decrypt(&self, input: &mut dyn Read) -> OnionResult<Vec<u8>>;
}
