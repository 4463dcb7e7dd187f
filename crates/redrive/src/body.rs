//! Request bodies and replayable buffering.
//!
//! Retrying a request means the wrapped transport must see an un-consumed
//! body on every attempt. [`BufferedBody`] reads the original [`Body`]
//! exactly once and hands out fresh views over the same captured bytes.

use crate::error::{Result, TransportError};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::BoxStream;
use std::fmt;

/// An outbound request body.
///
/// Either a chunk of bytes or a one-shot stream of byte chunks. Streams can
/// be consumed only once; the retry transport buffers them up front so every
/// attempt replays identical bytes.
pub enum Body {
    /// A fully materialized body.
    Bytes(Bytes),
    /// A one-shot stream of byte chunks.
    Stream(BoxStream<'static, std::io::Result<Bytes>>),
}

impl Body {
    /// Create a body from a stream of byte chunks.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: futures::Stream<Item = std::io::Result<Bytes>> + Send + 'static,
    {
        Self::Stream(stream.boxed())
    }

    /// Consume the body, collecting all of its bytes.
    ///
    /// For a streaming body this drains the stream; any chunk error aborts
    /// the collection.
    pub async fn into_bytes(self) -> std::io::Result<Bytes> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Stream(mut stream) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = stream.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok(buf.freeze())
            }
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for Body {
    fn from(bytes: &'static [u8]) -> Self {
        Self::Bytes(Bytes::from_static(bytes))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Bytes(Bytes::from(text))
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::Bytes(Bytes::from_static(text.as_bytes()))
    }
}

/// A request body captured once so it can be replayed on every attempt.
///
/// The captured bytes are immutable; [`replay`](Self::replay) returns a
/// fresh, independently consumable [`Body`] view without copying.
#[derive(Debug, Clone)]
pub struct BufferedBody {
    bytes: Bytes,
}

impl BufferedBody {
    /// Read `body` to completion, capturing its bytes.
    ///
    /// Failure to read the original body fails the whole retry operation
    /// before any attempt is made.
    pub async fn capture(body: Body) -> Result<Self> {
        let bytes = body.into_bytes().await.map_err(TransportError::BodyCapture)?;
        Ok(Self { bytes })
    }

    /// Produce a fresh body over the captured bytes.
    pub fn replay(&self) -> Body {
        Body::Bytes(self.bytes.clone())
    }

    /// The captured bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of captured bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the captured body is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
