//! SDP negotiation for MRCPv2 speech sessions.
//!
//! MRCP sets up its control channel, and the RTP audio that channel steers,
//! with a two document SDP offer/answer exchange. This crate implements the
//! narrow SDP subset that exchange needs and nothing more:
//!
//! * [`Session::parse`] turns SDP text into a [`Session`].
//! * [`offer_sdp`] and [`answer_sdp`] produce the two fixed-layout documents
//!   for the client and server role respectively.
//! * [`OFFER_MATCHER`] and [`ANSWER_MATCHER`] check a parsed session against
//!   the shape the role requires and extract the fields a caller needs: peer
//!   address, MRCP and RTP ports, resource/connection/channel identifiers and
//!   the RTP payload list.
//!
//! How the documents travel (SIP, the MRCP control connection) is up to the
//! caller, as is any session state built on the extracted fields. This is
//! deliberately not a general purpose SDP implementation: timing, bandwidth
//! and encryption lines are ignored on input and never produced on output.
//!
//! ```
//! use mrcp_sdp::{offer_sdp, Session, OFFER_MATCHER};
//!
//! // Client side: generate an offer for a synthesizer resource.
//! let offer = offer_sdp("speechsynth", "192.168.1.100", 4000);
//!
//! // Server side: parse it and pull out what we need.
//! let session = Session::parse(&offer)?;
//! let bindings = OFFER_MATCHER.matches(&session).expect("offer shape");
//!
//! assert_eq!(bindings.str("resource"), Some("speechsynth"));
//! assert_eq!(bindings.str("remote_rtp_ip"), Some("192.168.1.100"));
//! assert_eq!(bindings.port("remote_rtp_port"), Some(4000));
//! # Ok::<_, mrcp_sdp::SdpError>(())
//! ```

#![forbid(unsafe_code)]

#[macro_use]
extern crate tracing;

use thiserror::Error;

mod data;
pub use data::{Connection, Direction, MediaDescription, Session, Setup};

mod parser;

mod generate;
pub use generate::{answer_sdp, offer_sdp};

mod matcher;
pub use matcher::{Bindings, ConnectionPattern, MediaPattern, Pattern, SessionPattern, Value};
pub use matcher::{ANSWER_MATCHER, OFFER_MATCHER};

/// Errors from parsing SDP text.
///
/// All variants are fatal: [`Session::parse`] never returns a partial
/// session. A matcher declining a session is not an error, see
/// [`SessionPattern::matches`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdpError {
    /// A `c=` line did not have exactly 3 fields.
    #[error("malformed c= line: expected 3 fields, got {0}")]
    MalformedConnectionLine(usize),

    /// An `m=` line had too few fields for its media kind.
    #[error("malformed m= line for \"{kind}\": expected at least {required} fields, got {actual}")]
    MalformedMediaLine {
        /// First field of the `m=` line.
        kind: String,
        /// Minimum field count for this kind.
        required: usize,
        /// Field count actually present.
        actual: usize,
    },

    /// An `a=` line appeared before any `m=` line.
    #[error("a={0} attribute before any m= line")]
    AttributeBeforeMedia(String),

    /// The port field of an `m=` line was not a port number.
    #[error("bad m= line port: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
}
