use crate::data::{Connection, MediaDescription, Session};
use crate::SdpError;

/// Single pass over the input lines, keyed on the first character of each.
///
/// Only `c=`, `m=` and `a=` change state. `a=` lines always apply to the most
/// recently opened media section. The attribute value is the second colon
/// separated fragment; anything after a further colon is dropped, so
/// `a=resource:speechsynth:x` yields "speechsynth". That matches what peers
/// already on the wire expect and must not be "fixed" to a rejoin.
pub(crate) fn parse_sdp(input: &str) -> Result<Session, SdpError> {
    let mut session = Session::default();

    for line in input.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        let Some(key) = line.chars().next() else {
            continue;
        };
        // Value starts after "<key>=", whatever the second character is.
        let val = line.get(2..).unwrap_or("");

        match key {
            'c' => {
                let c: Vec<&str> = val.split(' ').collect();
                if c.len() != 3 {
                    return Err(SdpError::MalformedConnectionLine(c.len()));
                }
                session.connection = Some(Connection {
                    ip: c[2].to_string(),
                });
            }
            'm' => {
                let m: Vec<&str> = val.split(' ').collect();
                // split always yields at least one fragment
                let kind = m[0];
                let required = if kind == "application" { 3 } else { 4 };
                if m.len() < required {
                    return Err(SdpError::MalformedMediaLine {
                        kind: kind.to_string(),
                        required,
                        actual: m.len(),
                    });
                }
                session.media.push(MediaDescription {
                    kind: kind.to_string(),
                    port: m[1].parse()?,
                    protocol: m[2].to_string(),
                    payloads: m[3..].iter().map(|p| p.to_string()).collect(),
                    ..Default::default()
                });
            }
            'a' => {
                let mut a = val.split(':');
                let k = a.next().unwrap_or("");
                let v = a.next().map(str::to_string);

                let Some(media) = session.media.last_mut() else {
                    return Err(SdpError::AttributeBeforeMedia(k.to_string()));
                };

                match k {
                    "resource" => media.resource = v,
                    "setup" => media.setup = v,
                    "connection" => media.connection = v,
                    "direction" => media.direction = v,
                    "channel" => media.channel = v,
                    _ => debug!("Ignoring a={} attribute", k),
                }
            }
            _ => trace!("Ignoring {}= line", key),
        }
    }

    Ok(session)
}
