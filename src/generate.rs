use crate::data::{Direction, Setup};

// Fixed origin identifiers. SDP wants a fresh sess-id/sess-version per
// session; deployed peers key on these exact bytes, so they stay constant.
// Known limitation.
const OFFER_ORIGIN: &str = "mrcp_client 5772550679930491611 4608916746797952899";
const ANSWER_ORIGIN: &str = "mrcp_server 1212606071011504954 4868540303632141964";

/// The audio direction the offerer wants.
///
/// A synthesizer resource sends audio to us, so the offer declares
/// `recvonly`; a recognizer consumes our audio, so `sendonly`. The answer
/// side is the mirror image, see [`Direction::invert`].
fn offer_direction(resource_type: &str) -> Direction {
    if resource_type.ends_with("synth") {
        Direction::RecvOnly
    } else {
        Direction::SendOnly
    }
}

/// Generate the client side offer document.
///
/// `resource_type` is an MRCP resource name such as "speechsynth" or
/// "speechrecog". The MRCP control section is offered on the discard port 9
/// with `a=setup:active` and `a=connection:new`; the audio section carries a
/// single PCMU payload on `local_rtp_port`.
///
/// Always succeeds; the layout is fixed and CRLF terminated.
///
/// The `o=` line repeats the same session id/version pair on every call,
/// which breaks SDP's per-session uniqueness rule. Peers depend on the exact
/// bytes, so the constants are kept. Known limitation.
pub fn offer_sdp(resource_type: &str, local_rtp_ip: &str, local_rtp_port: u16) -> String {
    let setup = Setup::Active;
    let direction = offer_direction(resource_type);

    format!(
        "v=0\r\n\
         o={OFFER_ORIGIN} IN IP4 {local_rtp_ip}\r\n\
         s=-\r\n\
         c=IN IP4 {local_rtp_ip}\r\n\
         t=0 0\r\n\
         m=application 9 TCP/MRCPv2 1\r\n\
         a=setup:{setup}\r\n\
         a=connection:new\r\n\
         a=resource:{resource_type}\r\n\
         a=cmid:1\r\n\
         m=audio {local_rtp_port} RTP/AVP 0\r\n\
         a=rtpmap:0 PCMU/8000\r\n\
         a={direction}\r\n\
         a=mid:1\r\n"
    )
}

/// Generate the server side answer document.
///
/// `connection` is the channel reuse tag echoed back ("new" or "existing"),
/// `channel_identifier` the allocated MRCP channel id, and `resource_type`
/// the resource the offer asked for, used only to mirror the audio
/// direction. The control section answers on `mrcp_port` with
/// `a=setup:passive`.
///
/// Always succeeds. The `o=` line identifiers are constant across calls,
/// same caveat as [`offer_sdp`].
pub fn answer_sdp(
    local_ip: &str,
    mrcp_port: u16,
    rtp_port: u16,
    connection: &str,
    channel_identifier: &str,
    resource_type: &str,
) -> String {
    let setup = Setup::Passive;
    let direction = offer_direction(resource_type).invert();

    format!(
        "v=0\r\n\
         o={ANSWER_ORIGIN} IN IP4 {local_ip}\r\n\
         s=-\r\n\
         c=IN IP4 {local_ip}\r\n\
         t=0 0\r\n\
         m=application {mrcp_port} TCP/MRCPv2 1\r\n\
         a=setup:{setup}\r\n\
         a=connection:{connection}\r\n\
         a=channel:{channel_identifier}\r\n\
         a=cmid:1\r\n\
         m=audio {rtp_port} RTP/AVP 0\r\n\
         a=rtpmap:0 PCMU/8000\r\n\
         a={direction}\r\n\
         a=mid:1\r\n"
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn write_offer() {
        assert_eq!(
            offer_sdp("speechsynth", "192.168.1.100", 4000),
            "v=0\r\n\
             o=mrcp_client 5772550679930491611 4608916746797952899 IN IP4 192.168.1.100\r\n\
             s=-\r\n\
             c=IN IP4 192.168.1.100\r\n\
             t=0 0\r\n\
             m=application 9 TCP/MRCPv2 1\r\n\
             a=setup:active\r\n\
             a=connection:new\r\n\
             a=resource:speechsynth\r\n\
             a=cmid:1\r\n\
             m=audio 4000 RTP/AVP 0\r\n\
             a=rtpmap:0 PCMU/8000\r\n\
             a=recvonly\r\n\
             a=mid:1\r\n"
        );
    }

    #[test]
    fn write_answer() {
        assert_eq!(
            answer_sdp(
                "10.0.0.21",
                32_416,
                10_000,
                "new",
                "32AECB23433801@speechsynth",
                "speechsynth"
            ),
            "v=0\r\n\
             o=mrcp_server 1212606071011504954 4868540303632141964 IN IP4 10.0.0.21\r\n\
             s=-\r\n\
             c=IN IP4 10.0.0.21\r\n\
             t=0 0\r\n\
             m=application 32416 TCP/MRCPv2 1\r\n\
             a=setup:passive\r\n\
             a=connection:new\r\n\
             a=channel:32AECB23433801@speechsynth\r\n\
             a=cmid:1\r\n\
             m=audio 10000 RTP/AVP 0\r\n\
             a=rtpmap:0 PCMU/8000\r\n\
             a=sendonly\r\n\
             a=mid:1\r\n"
        );
    }

    #[test]
    fn offer_direction_by_resource() {
        assert!(offer_sdp("speechsynth", "10.0.0.1", 4000).contains("a=recvonly\r\n"));
        assert!(offer_sdp("speechrecog", "10.0.0.1", 4000).contains("a=sendonly\r\n"));
        // the suffix rule, not an allowlist: any *synth resource receives
        assert!(offer_sdp("basicsynth", "10.0.0.1", 4000).contains("a=recvonly\r\n"));
    }

    #[test]
    fn answer_direction_mirrors_offer() {
        let answer = |rt| answer_sdp("10.0.0.1", 9000, 4000, "new", "c@r", rt);
        assert!(answer("speechsynth").contains("a=sendonly\r\n"));
        assert!(answer("speechrecog").contains("a=recvonly\r\n"));
    }

    #[test]
    fn origin_constants_repeat() {
        // identical on every invocation, see the module note
        assert_eq!(
            offer_sdp("speechsynth", "10.0.0.1", 4000),
            offer_sdp("speechsynth", "10.0.0.1", 4000)
        );
    }
}
