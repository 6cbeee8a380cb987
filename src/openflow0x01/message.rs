//! Encapsulates framing of OpenFlow 1.0 messages the controller exchanges
//! with a switch.

use byteorder::WriteBytesExt;

use super::{
    Action, FlowMod, FlowModCmd, MsgCode, PacketIn, Pattern, PortStatus, SwitchFeatures, Timeout,
};
use crate::error::{Error, Result};
use crate::ofp_header::OfpHeader;
use crate::ofp_message::OfpMessage;

/// Abstractions of OpenFlow 1.0 messages mapping to message codes.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Hello,
    EchoRequest(Vec<u8>),
    EchoReply(Vec<u8>),
    FeaturesReq,
    FeaturesReply(SwitchFeatures),
    FlowMod(FlowMod),
    PacketIn(PacketIn),
    PortStatus(PortStatus),
}

impl Message {
    /// Map `Message` to associated OpenFlow message type code `MsgCode`.
    fn msg_code_of_message(msg: &Message) -> MsgCode {
        match *msg {
            Message::Hello => MsgCode::Hello,
            Message::EchoRequest(_) => MsgCode::EchoReq,
            Message::EchoReply(_) => MsgCode::EchoResp,
            Message::FeaturesReq => MsgCode::FeaturesReq,
            Message::FeaturesReply(_) => MsgCode::FeaturesResp,
            Message::FlowMod(_) => MsgCode::FlowMod,
            Message::PacketIn(_) => MsgCode::PacketIn,
            Message::PortStatus(_) => MsgCode::PortStatus,
        }
    }

    /// Marshal the body of the OpenFlow message `msg`. Messages that only
    /// ever travel switch-to-controller have no marshal path.
    fn marshal_body(msg: Message, bytes: &mut Vec<u8>) {
        match msg {
            Message::Hello => (),
            Message::EchoRequest(buf) |
            Message::EchoReply(buf) => {
                for b in buf {
                    bytes.write_u8(b).unwrap();
                }
            }
            Message::FeaturesReq => (),
            Message::FlowMod(flow_mod) => FlowMod::marshal(flow_mod, bytes),
            Message::FeaturesReply(_) |
            Message::PacketIn(_) |
            Message::PortStatus(_) => (),
        }
    }
}

impl OfpMessage for Message {
    fn size_of(msg: &Message) -> usize {
        let body = match *msg {
            Message::Hello | Message::FeaturesReq => 0,
            Message::EchoRequest(ref buf) |
            Message::EchoReply(ref buf) => buf.len(),
            Message::FeaturesReply(ref sf) => SwitchFeatures::size_of(sf),
            Message::FlowMod(ref fm) => FlowMod::size_of(fm),
            Message::PacketIn(ref pi) => PacketIn::size_of(pi),
            Message::PortStatus(ref ps) => PortStatus::size_of(ps),
        };
        OfpHeader::size() + body
    }

    fn header_of(xid: u32, msg: &Message) -> OfpHeader {
        // The header length field is 16 bits; an oversized echo payload
        // saturates rather than wrapping.
        let len = u16::try_from(Message::size_of(msg)).unwrap_or(u16::MAX);
        OfpHeader::new(0x01, Message::msg_code_of_message(msg) as u8, len, xid)
    }

    fn marshal(xid: u32, msg: Message) -> Vec<u8> {
        let hdr = Message::header_of(xid, &msg);
        let len = hdr.length();
        let mut bytes = vec![];
        OfpHeader::marshal(&mut bytes, hdr);
        Message::marshal_body(msg, &mut bytes);
        // Keep the frame in agreement with a saturated header length.
        bytes.truncate(len);
        bytes
    }

    fn parse(header: &OfpHeader, buf: &[u8]) -> Result<(u32, Message)> {
        let typ = header.type_code()?;
        let msg = match typ {
            MsgCode::Hello => Message::Hello,
            MsgCode::EchoReq => Message::EchoRequest(buf.to_vec()),
            MsgCode::EchoResp => Message::EchoReply(buf.to_vec()),
            MsgCode::FeaturesResp => Message::FeaturesReply(SwitchFeatures::parse(buf)?),
            MsgCode::PacketIn => Message::PacketIn(PacketIn::parse(buf)?),
            MsgCode::PortStatus => Message::PortStatus(PortStatus::parse(buf)?),
            code => return Err(Error::UnhandledMessage(code)),
        };
        Ok((header.xid(), msg))
    }
}

/// Return a `FlowMod` adding a flow parameterized by the given `priority`,
/// `pattern`, and `actions`.
pub fn add_flow(prio: u16, pattern: Pattern, actions: Vec<Action>) -> FlowMod {
    FlowMod {
        command: FlowModCmd::AddFlow,
        pattern,
        priority: prio,
        actions,
        cookie: 0,
        idle_timeout: Timeout::Permanent,
        hard_timeout: Timeout::Permanent,
        notify_when_removed: false,
        apply_to_packet: None,
        out_port: None,
        check_overlap: false,
    }
}

/// Return a `FlowMod` deleting every flow entry on the switch.
pub fn delete_all_flows() -> FlowMod {
    FlowMod {
        command: FlowModCmd::DeleteFlow,
        pattern: Pattern::match_all(),
        priority: 0,
        actions: vec![],
        cookie: 0,
        idle_timeout: Timeout::Permanent,
        hard_timeout: Timeout::Permanent,
        notify_when_removed: false,
        apply_to_packet: None,
        out_port: None,
        check_overlap: false,
    }
}
