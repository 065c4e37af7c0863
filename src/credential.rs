//! Connection credentials.
//!
//! A credential packs a hub's IPv4 address and port into one short base-36 token that an
//! operator can read out or paste to another participant:
//!
//! ```text
//! combined = (address << 16) | port      // 48 significant bits
//! token    = base36(combined)            // digits 0-9 then a-z, no padding
//! ```
//!
//! Decoding accepts upper case input as well.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::str::FromStr;

use crate::{HuddleError, Result};

/// Base-36 digit alphabet.
pub const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Largest value a credential can carry (32 address bits + 16 port bits).
const MAX_COMBINED: u64 = (1 << 48) - 1;

/// Check whether a character belongs to the credential alphabet (either case).
pub fn is_credential_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// A decoded hub credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credential {
    addr: SocketAddrV4,
}

impl Credential {
    /// Create a credential for the given hub address.
    pub fn new(ip: Ipv4Addr, port: u16) -> Self {
        Self {
            addr: SocketAddrV4::new(ip, port),
        }
    }

    /// Hub IPv4 address.
    pub fn ip(&self) -> Ipv4Addr {
        *self.addr.ip()
    }

    /// Hub port.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Hub socket address.
    pub fn socket_addr(&self) -> SocketAddrV4 {
        self.addr
    }

    /// Encode as a base-36 token.
    pub fn encode(&self) -> String {
        let combined = (u64::from(u32::from(self.ip())) << 16) | u64::from(self.port());
        to_base36(combined)
    }

    /// Decode a base-36 token.
    pub fn decode(token: &str) -> Result<Self> {
        let combined = from_base36(token)?;
        let port = (combined & 0xFFFF) as u16;
        let ip = Ipv4Addr::from((combined >> 16) as u32);
        Ok(Self::new(ip, port))
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Credential {
    type Err = HuddleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

/// Encode an address and port into a credential token.
pub fn encode(ip: Ipv4Addr, port: u16) -> String {
    Credential::new(ip, port).encode()
}

/// Decode a credential token into an address and port.
pub fn decode(token: &str) -> Result<(Ipv4Addr, u16)> {
    let credential = Credential::decode(token)?;
    Ok((credential.ip(), credential.port()))
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    // Alphabet is ASCII.
    digits.into_iter().map(char::from).collect()
}

fn from_base36(token: &str) -> Result<u64> {
    if token.is_empty() {
        return Err(HuddleError::InvalidCredential("empty credential".to_string()));
    }

    let mut n: u64 = 0;
    for c in token.chars() {
        let digit = c
            .to_digit(36)
            .ok_or_else(|| {
                HuddleError::InvalidCredential(format!("unexpected character {c:?}"))
            })?;
        n = n
            .checked_mul(36)
            .and_then(|n| n.checked_add(u64::from(digit)))
            .filter(|n| *n <= MAX_COMBINED)
            .ok_or_else(|| HuddleError::InvalidCredential("credential too long".to_string()))?;
    }
    Ok(n)
}
