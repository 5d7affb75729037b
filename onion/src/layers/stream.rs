//! Layer decoded from a byte stream.

use std::io::{Cursor, Read};
use std::sync::Arc;

use async_trait::async_trait;

use crate::cipher::Cipher;
use crate::decoder::{Decoder, DecoderRegistry};
use crate::layer::{LayerPublisher, LayerUpdates};
use crate::{ConfigMap, Layer, OnionResult};

/// A layer whose content is read from a stream in a named format.
///
/// The first stream is decoded at construction, so malformed input is
/// reported before the layer is ever registered. Later streams passed to
/// [`StreamLayer::reload`] replace the snapshot in every registry holding the
/// layer.
pub struct StreamLayer {
    name: String,
    format: String,
    decoder: Arc<dyn Decoder>,
    cipher: Option<Arc<dyn Cipher>>,
    publisher: LayerPublisher,
}

impl StreamLayer {
    /// Decode `input` as `format`, decrypting it with `cipher` first when
    /// one is given.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OnionError::UnknownFormat`] when `decoders` has no
    /// decoder for `format`, or the cipher or decoder failure.
    pub fn new(
        name: impl Into<String>,
        format: &str,
        input: &mut dyn Read,
        cipher: Option<Arc<dyn Cipher>>,
        decoders: &DecoderRegistry,
    ) -> OnionResult<Self> {
        let decoder = decoders.get(format)?;
        let initial = decode_with(decoder.as_ref(), cipher.as_deref(), input)?;
        Ok(Self {
            name: name.into(),
            format: format.to_ascii_lowercase(),
            decoder,
            cipher,
            publisher: LayerPublisher::new(initial),
        })
    }

    /// Decode a fresh stream and publish it as the new snapshot.
    ///
    /// A failure is published as well, so registries report it and keep the
    /// previous snapshot; it is also returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns the cipher or decoder failure.
    pub fn reload(&self, input: &mut dyn Read) -> OnionResult<()> {
        match decode_with(self.decoder.as_ref(), self.cipher.as_deref(), input) {
            Ok(data) => {
                self.publisher.publish(data);
                Ok(())
            }
            Err(err) => {
                self.publisher.publish_failure(Arc::clone(&err));
                Err(err)
            }
        }
    }

    pub(crate) fn publish_failure(&self, err: Arc<crate::OnionError>) {
        self.publisher.publish_failure(err);
    }

    /// Lower-cased format name the layer decodes.
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The latest successfully decoded snapshot.
    #[must_use]
    pub fn current(&self) -> ConfigMap {
        self.publisher.current()
    }
}

impl std::fmt::Debug for StreamLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamLayer")
            .field("name", &self.name)
            .field("format", &self.format)
            .field("encrypted", &self.cipher.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Layer for StreamLayer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> OnionResult<ConfigMap> {
        Ok(self.publisher.current())
    }

    fn watch(&self) -> Option<LayerUpdates> {
        Some(self.publisher.subscribe())
    }
}

fn decode_with(
    decoder: &dyn Decoder,
    cipher: Option<&dyn Cipher>,
    input: &mut dyn Read,
) -> OnionResult<ConfigMap> {
    match cipher {
        None => decoder.decode(input),
        Some(cipher) => {
            let bytes = cipher.decrypt(input)?;
            decoder.decode(&mut Cursor::new(bytes))
        }
    }
}
