use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::data::{MediaDescription, Session};

/// Constraint over a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern<T> {
    /// The field is ignored.
    Any,
    /// The field must equal this value exactly.
    Literal(T),
    /// The field always matches and its value is captured under this name.
    Collect(&'static str),
}

impl<T> Default for Pattern<T> {
    fn default() -> Self {
        Pattern::Any
    }
}

impl<T> Pattern<T>
where
    T: Clone + PartialEq + Into<Value>,
{
    fn matches(&self, actual: &T, binds: &mut Bindings) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Literal(want) => want == actual,
            Pattern::Collect(name) => {
                binds.insert(*name, actual.clone().into());
                true
            }
        }
    }

    /// Optional fields: a literal or a collector needs a value to look at,
    /// so both decline an absent field. `Any` matches regardless.
    fn matches_opt(&self, actual: Option<&T>, binds: &mut Bindings) -> bool {
        match (self, actual) {
            (Pattern::Any, _) => true,
            (_, Some(v)) => self.matches(v, binds),
            (_, None) => false,
        }
    }
}

/// A value captured by a [`Pattern::Collect`] collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A string field.
    Str(String),
    /// A port number.
    Port(u16),
    /// A payload type list.
    Payloads(Vec<String>),
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Port(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::Payloads(v)
    }
}

/// Named values captured by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bindings(HashMap<&'static str, Value>);

impl Bindings {
    fn insert(&mut self, name: &'static str, value: Value) {
        // last write wins if a pattern reuses a name
        self.0.insert(name, value);
    }

    /// A captured string, or `None` if `name` wasn't captured as one.
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(Value::Str(v)) => Some(v),
            _ => None,
        }
    }

    /// A captured port number.
    pub fn port(&self, name: &str) -> Option<u16> {
        match self.0.get(name) {
            Some(Value::Port(v)) => Some(*v),
            _ => None,
        }
    }

    /// A captured payload list.
    pub fn payloads(&self, name: &str) -> Option<&[String]> {
        match self.0.get(name) {
            Some(Value::Payloads(v)) => Some(v),
            _ => None,
        }
    }

    /// The raw captured value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

/// Declarative shape over a [`Session`].
///
/// Every field left at its default is ignored, so a pattern constrains a
/// subset of the session and extra data on the actual session never causes
/// a mismatch. [`OFFER_MATCHER`] and [`ANSWER_MATCHER`] are the two shapes
/// the MRCP exchange uses; custom patterns can be built the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPattern {
    /// Shape of the session level connection. `Some` requires the `c=` line
    /// to have been present.
    pub connection: Option<ConnectionPattern>,
    /// Unordered shapes for the media list, one per expected entry.
    pub media: Option<Vec<MediaPattern>>,
}

/// Shape over [`Connection`](crate::Connection).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionPattern {
    /// Constraint on the connection address.
    pub ip: Pattern<String>,
}

/// Shape over a single [`MediaDescription`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaPattern {
    /// Constraint on the media kind ("application", "audio", ...).
    pub kind: Pattern<String>,
    /// Constraint on the transport port.
    pub port: Pattern<u16>,
    /// Constraint on the transport protocol.
    pub protocol: Pattern<String>,
    /// Constraint on the `m=` line format tokens.
    pub payloads: Pattern<Vec<String>>,
    /// Constraint on `a=setup:`.
    pub setup: Pattern<String>,
    /// Constraint on `a=connection:`.
    pub connection: Pattern<String>,
    /// Constraint on `a=resource:`.
    pub resource: Pattern<String>,
    /// Constraint on `a=channel:`.
    pub channel: Pattern<String>,
    /// Constraint on `a=direction:`.
    pub direction: Pattern<String>,
}

impl SessionPattern {
    /// Match `session` against this pattern.
    ///
    /// Returns the captured bindings, or `None` when the session doesn't
    /// have the expected shape. "No match" is an ordinary negative answer,
    /// not an error. Matching is read only and total; a failed match leaks
    /// no partial bindings.
    pub fn matches(&self, session: &Session) -> Option<Bindings> {
        let mut binds = Bindings::default();

        if let Some(cp) = &self.connection {
            let actual = session.connection.as_ref()?;
            if !cp.ip.matches(&actual.ip, &mut binds) {
                return None;
            }
        }

        if let Some(pats) = &self.media {
            if !match_unordered(pats, &session.media, &mut binds) {
                return None;
            }
        }

        Some(binds)
    }
}

impl MediaPattern {
    fn matches(&self, m: &MediaDescription, binds: &mut Bindings) -> bool {
        self.kind.matches(&m.kind, binds)
            && self.port.matches(&m.port, binds)
            && self.protocol.matches(&m.protocol, binds)
            && self.payloads.matches(&m.payloads, binds)
            && self.setup.matches_opt(m.setup.as_ref(), binds)
            && self.connection.matches_opt(m.connection.as_ref(), binds)
            && self.resource.matches_opt(m.resource.as_ref(), binds)
            && self.channel.matches_opt(m.channel.as_ref(), binds)
            && self.direction.matches_opt(m.direction.as_ref(), binds)
    }
}

/// Assign each pattern its own element of `actual`, in any order.
///
/// A backtracking search over a bitmask of used elements, not a greedy
/// first fit: a pattern releases its element again when the remaining
/// patterns can't be placed. Lists of different length never match. N is
/// two in this domain, so the factorial worst case never bites; the mask
/// bounds it at 64 either way.
fn match_unordered(
    pats: &[MediaPattern],
    actual: &[MediaDescription],
    binds: &mut Bindings,
) -> bool {
    if pats.len() != actual.len() || pats.len() > 64 {
        return false;
    }
    assign(pats, actual, 0, 0, binds)
}

fn assign(
    pats: &[MediaPattern],
    actual: &[MediaDescription],
    idx: usize,
    used: u64,
    binds: &mut Bindings,
) -> bool {
    let Some(pat) = pats.get(idx) else {
        // every pattern placed
        return true;
    };

    for (i, m) in actual.iter().enumerate() {
        if used & (1 << i) != 0 {
            continue;
        }
        let mut trial = binds.clone();
        if pat.matches(m, &mut trial) && assign(pats, actual, idx + 1, used | (1 << i), &mut trial)
        {
            *binds = trial;
            return true;
        }
    }

    false
}

/// Shape of a received MRCP offer.
///
/// Captures `remote_rtp_ip`, `remote_mrcp_port`, `resource`, `connection`,
/// `remote_rtp_port` and `rtp_payloads`. The two media sections may appear
/// in either order.
pub static OFFER_MATCHER: Lazy<SessionPattern> = Lazy::new(|| SessionPattern {
    connection: Some(ConnectionPattern {
        ip: Pattern::Collect("remote_rtp_ip"),
    }),
    media: Some(vec![
        MediaPattern {
            kind: Pattern::Literal("application".to_string()),
            port: Pattern::Collect("remote_mrcp_port"),
            protocol: Pattern::Literal("TCP/MRCPv2".to_string()),
            resource: Pattern::Collect("resource"),
            connection: Pattern::Collect("connection"),
            ..Default::default()
        },
        MediaPattern {
            kind: Pattern::Literal("audio".to_string()),
            port: Pattern::Collect("remote_rtp_port"),
            protocol: Pattern::Literal("RTP/AVP".to_string()),
            payloads: Pattern::Collect("rtp_payloads"),
            ..Default::default()
        },
    ]),
});

/// Shape of a received MRCP answer.
///
/// Captures `remote_ip`, `remote_mrcp_port`, `channel`, `remote_rtp_port`
/// and `rtp_payloads`, and additionally requires the control section's
/// format list to be exactly `["1"]`.
pub static ANSWER_MATCHER: Lazy<SessionPattern> = Lazy::new(|| SessionPattern {
    connection: Some(ConnectionPattern {
        ip: Pattern::Collect("remote_ip"),
    }),
    media: Some(vec![
        MediaPattern {
            kind: Pattern::Literal("application".to_string()),
            port: Pattern::Collect("remote_mrcp_port"),
            protocol: Pattern::Literal("TCP/MRCPv2".to_string()),
            payloads: Pattern::Literal(vec!["1".to_string()]),
            channel: Pattern::Collect("channel"),
            ..Default::default()
        },
        MediaPattern {
            kind: Pattern::Literal("audio".to_string()),
            port: Pattern::Collect("remote_rtp_port"),
            protocol: Pattern::Literal("RTP/AVP".to_string()),
            payloads: Pattern::Collect("rtp_payloads"),
            ..Default::default()
        },
    ]),
});

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::Connection;

    fn audio(port: u16) -> MediaDescription {
        MediaDescription {
            kind: "audio".into(),
            port,
            protocol: "RTP/AVP".into(),
            payloads: vec!["0".into()],
            ..Default::default()
        }
    }

    fn application(port: u16) -> MediaDescription {
        MediaDescription {
            kind: "application".into(),
            port,
            protocol: "TCP/MRCPv2".into(),
            payloads: vec!["1".into()],
            connection: Some("new".into()),
            resource: Some("speechsynth".into()),
            ..Default::default()
        }
    }

    fn offer_session() -> Session {
        Session {
            connection: Some(Connection {
                ip: "10.0.0.5".into(),
            }),
            media: vec![application(9), audio(4000)],
        }
    }

    #[test]
    fn offer_shape() {
        let binds = OFFER_MATCHER.matches(&offer_session()).unwrap();

        assert_eq!(binds.str("remote_rtp_ip"), Some("10.0.0.5"));
        assert_eq!(binds.port("remote_mrcp_port"), Some(9));
        assert_eq!(binds.str("resource"), Some("speechsynth"));
        assert_eq!(binds.str("connection"), Some("new"));
        assert_eq!(binds.port("remote_rtp_port"), Some(4000));
        assert_eq!(binds.payloads("rtp_payloads"), Some(&["0".to_string()][..]));
    }

    #[test]
    fn media_order_does_not_matter() {
        let mut session = offer_session();
        session.media.reverse();

        let binds = OFFER_MATCHER.matches(&session).unwrap();
        assert_eq!(binds.port("remote_mrcp_port"), Some(9));
        assert_eq!(binds.port("remote_rtp_port"), Some(4000));
    }

    #[test]
    fn list_length_must_match() {
        let mut session = offer_session();
        session.media.push(audio(4002));
        assert_eq!(OFFER_MATCHER.matches(&session), None);

        session.media.truncate(1);
        assert_eq!(OFFER_MATCHER.matches(&session), None);
    }

    #[test]
    fn literal_mismatch() {
        let mut session = offer_session();
        session.media[1].protocol = "UDP/AVP".into();
        assert_eq!(OFFER_MATCHER.matches(&session), None);
    }

    #[test]
    fn collector_requires_value() {
        let mut session = offer_session();
        session.media[0].resource = None;
        assert_eq!(OFFER_MATCHER.matches(&session), None);
    }

    #[test]
    fn missing_session_connection() {
        let mut session = offer_session();
        session.connection = None;
        assert_eq!(OFFER_MATCHER.matches(&session), None);
    }

    #[test]
    fn assignment_backtracks() {
        // The first pattern matches both media. First fit hands it the
        // application entry and strands the second pattern; the search must
        // back out and swap the assignment.
        let pattern = SessionPattern {
            connection: None,
            media: Some(vec![
                MediaPattern {
                    kind: Pattern::Collect("first_kind"),
                    ..Default::default()
                },
                MediaPattern {
                    kind: Pattern::Literal("application".to_string()),
                    ..Default::default()
                },
            ]),
        };

        let session = Session {
            connection: None,
            media: vec![application(9), audio(4000)],
        };

        let binds = pattern.matches(&session).unwrap();
        assert_eq!(binds.str("first_kind"), Some("audio"));
    }

    #[test]
    fn answer_requires_control_format_1() {
        let mut session = offer_session();
        {
            let app = &mut session.media[0];
            app.resource = None;
            app.channel = Some("32AECB23433801@speechsynth".into());
        }

        let binds = ANSWER_MATCHER.matches(&session).unwrap();
        assert_eq!(
            binds.str("channel"),
            Some("32AECB23433801@speechsynth")
        );

        session.media[0].payloads = vec!["1".into(), "2".into()];
        assert_eq!(ANSWER_MATCHER.matches(&session), None);
    }

    #[test]
    fn typed_accessors_check_the_kind() {
        let binds = OFFER_MATCHER.matches(&offer_session()).unwrap();
        // "resource" holds a string, not a port or a payload list
        assert_eq!(binds.port("resource"), None);
        assert_eq!(binds.payloads("resource"), None);
        assert_eq!(binds.str("nonexistent"), None);
    }

    #[test]
    fn bindings_serialize_for_signaling() {
        let pattern = SessionPattern {
            connection: None,
            media: Some(vec![MediaPattern {
                port: Pattern::Collect("port"),
                ..Default::default()
            }]),
        };
        let session = Session {
            connection: None,
            media: vec![audio(4000)],
        };

        let binds = pattern.matches(&session).unwrap();
        assert_eq!(serde_json::to_string(&binds).unwrap(), "{\"port\":4000}");
    }
}
