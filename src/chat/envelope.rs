//! Wire framing for chat messages.
//!
//! Every frame the hub sends is `colorIndex:payload`. An empty payload is a presence
//! event (join or leave); anything else is a participant's message. The colour index is
//! always the sender's.
//!
//! The payload travels either as typed (`WireCodec::Plain`) or scrambled
//! (`WireCodec::Obscured`): XOR with the fixed key `supersecret`, then standard padded
//! base64. The scrambler is a compatibility format only. Anyone with the key, which is
//! public, can read it.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use crate::{HuddleError, Result};

/// Fixed scrambling key shared by every obscured deployment.
pub const OBSCURE_KEY: &[u8] = b"supersecret";

/// A framed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Sender's colour index.
    pub color_index: usize,
    /// Message text, empty for presence events.
    pub payload: String,
}

impl Envelope {
    /// Create a message envelope.
    pub fn new(color_index: usize, payload: impl Into<String>) -> Self {
        Self {
            color_index,
            payload: payload.into(),
        }
    }

    /// Create a presence (join/leave) envelope.
    pub fn presence(color_index: usize) -> Self {
        Self::new(color_index, String::new())
    }

    /// Whether this envelope announces a join or leave.
    pub fn is_presence(&self) -> bool {
        self.payload.trim().is_empty()
    }

    /// Encode as `colorIndex:payload`.
    pub fn encode(&self) -> String {
        format!("{}:{}", self.color_index, self.payload)
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.color_index, self.payload)
    }
}

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A well-formed envelope.
    Envelope(Envelope),
    /// Anything without a numeric `index:` prefix, passed through untouched.
    Opaque(String),
}

impl Frame {
    /// Parse a wire frame. Never fails; unrecognised text becomes `Frame::Opaque`.
    pub fn parse(text: &str) -> Self {
        match text.split_once(':') {
            Some((index, payload)) => match index.parse::<usize>() {
                Ok(color_index) => Frame::Envelope(Envelope::new(color_index, payload)),
                Err(_) => Frame::Opaque(text.to_string()),
            },
            None => Frame::Opaque(text.to_string()),
        }
    }

    /// Colour index, if this is an envelope.
    pub fn color_index(&self) -> Option<usize> {
        match self {
            Frame::Envelope(envelope) => Some(envelope.color_index),
            Frame::Opaque(_) => None,
        }
    }
}

/// Payload encoding used on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireCodec {
    /// Payload is the text as typed. Browsers render this directly.
    #[default]
    Plain,
    /// Payload is XOR-scrambled with `OBSCURE_KEY` and base64 encoded.
    Obscured,
}

impl WireCodec {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            WireCodec::Plain => "plain",
            WireCodec::Obscured => "obscured",
        }
    }

    /// Encode an outbound payload.
    pub fn encode_payload(&self, text: &str) -> String {
        match self {
            WireCodec::Plain => text.to_string(),
            WireCodec::Obscured => obscure(text),
        }
    }

    /// Decode an inbound payload. Malformed input comes back unchanged.
    pub fn decode_payload(&self, payload: &str) -> String {
        match self {
            WireCodec::Plain => payload.to_string(),
            WireCodec::Obscured => reveal(payload),
        }
    }
}

impl fmt::Display for WireCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WireCodec {
    type Err = HuddleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(WireCodec::Plain),
            "obscured" => Ok(WireCodec::Obscured),
            other => Err(HuddleError::Config(format!("unknown codec: {other}"))),
        }
    }
}

fn xor_with_key(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .zip(OBSCURE_KEY.iter().cycle())
        .map(|(b, k)| b ^ k)
        .collect()
}

/// Scramble raw bytes into base64 text.
pub fn obscure_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(xor_with_key(bytes))
}

/// Reverse `obscure_bytes`. Returns `None` when the input is not valid base64.
pub fn reveal_bytes(text: &str) -> Option<Vec<u8>> {
    STANDARD.decode(text).ok().map(|bytes| xor_with_key(&bytes))
}

/// Scramble a text payload.
pub fn obscure(text: &str) -> String {
    obscure_bytes(text.as_bytes())
}

/// Unscramble a text payload, returning the input unchanged if it is not a
/// scrambled UTF-8 string.
pub fn reveal(text: &str) -> String {
    reveal_bytes(text)
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| text.to_string())
}
