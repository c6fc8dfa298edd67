use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parser::parse_sdp;
use crate::SdpError;

/// A parsed session description.
///
/// Produced by [`Session::parse`] and read by the matchers. The `Display`
/// impl writes the session back out as CRLF terminated SDP text, emitting
/// only the lines the model holds (a `c=` line and the `m=` blocks).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session level connection data, from the `c=` line.
    pub connection: Option<Connection>,
    /// Media descriptions, in the order their `m=` lines appeared.
    pub media: Vec<MediaDescription>,
}

impl Session {
    /// Parse SDP text.
    ///
    /// Tolerates LF, CRLF or mixed line endings. Lines other than `c=`, `m=`
    /// and `a=` are ignored. Fails on the malformed inputs described by
    /// [`SdpError`]; never returns a partial session.
    pub fn parse(input: &str) -> Result<Session, SdpError> {
        parse_sdp(input)
    }
}

/// Connection data from the session level `c=` line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// The connection address, i.e. the third field of `c=IN IP4 <addr>`.
    pub ip: String,
}

/// One `m=` line and the recognized `a=` attributes that followed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescription {
    /// Media kind: "application", "audio", ... Kept as an open string so
    /// kinds we don't know about still parse.
    pub kind: String,
    /// Transport port from the `m=` line.
    pub port: u16,
    /// Transport protocol, e.g. "TCP/MRCPv2" or "RTP/AVP".
    pub protocol: String,
    /// Remaining `m=` line tokens. RTP payload types for audio, and the
    /// fixed "1" format token for the MRCP control section.
    pub payloads: Vec<String>,
    /// From `a=setup:`. Kept verbatim, not validated.
    pub setup: Option<String>,
    /// From `a=connection:`. A channel reuse tag such as "new" or
    /// "existing", not an address; unrelated to [`Connection`].
    pub connection: Option<String>,
    /// From `a=resource:`, e.g. "speechsynth".
    pub resource: Option<String>,
    /// From `a=channel:`, the MRCP channel identifier.
    pub channel: Option<String>,
    /// From `a=direction:`. Kept verbatim, not validated.
    pub direction: Option<String>,
}

/// Media direction, as used by the generators.
///
/// The parser does not produce these: a received `a=direction:` value stays a
/// verbatim string on [`MediaDescription`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `a=sendonly`
    SendOnly,
    /// `a=recvonly`
    RecvOnly,
}

impl Direction {
    /// The same media leg seen from the other side of the exchange.
    pub fn invert(&self) -> Self {
        match self {
            Direction::SendOnly => Direction::RecvOnly,
            Direction::RecvOnly => Direction::SendOnly,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::SendOnly => "sendonly",
                Direction::RecvOnly => "recvonly",
            }
        )
    }
}

/// `a=setup:` role for the MRCP control connection.
///
/// The offerer opens the TCP connection (active), the answerer listens
/// (passive). Like [`Direction`] this is generation vocabulary only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setup {
    /// `a=setup:active`
    Active,
    /// `a=setup:passive`
    Passive,
}

impl fmt::Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Setup::Active => "active",
                Setup::Passive => "passive",
            }
        )
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(c) = &self.connection {
            write!(f, "{}", c)?;
        }
        for m in &self.media {
            write!(f, "{}", m)?;
        }
        Ok(())
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c=IN IP4 {}\r\n", self.ip)
    }
}

impl fmt::Display for MediaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m={} {} {}", self.kind, self.port, self.protocol)?;
        for p in &self.payloads {
            write!(f, " {}", p)?;
        }
        write!(f, "\r\n")?;
        if let Some(v) = &self.setup {
            write!(f, "a=setup:{}\r\n", v)?;
        }
        if let Some(v) = &self.connection {
            write!(f, "a=connection:{}\r\n", v)?;
        }
        if let Some(v) = &self.resource {
            write!(f, "a=resource:{}\r\n", v)?;
        }
        if let Some(v) = &self.channel {
            write!(f, "a=channel:{}\r\n", v)?;
        }
        if let Some(v) = &self.direction {
            write!(f, "a=direction:{}\r\n", v)?;
        }
        Ok(())
    }
}
