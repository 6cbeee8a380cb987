use std::io::{BufRead, Cursor};
use std::mem::size_of;
use std::net::Ipv4Addr;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::bits::{bit, test_bit};
use crate::error::{Error, Result};

pub mod message;

/// OpenFlow 1.0 message type codes, used by headers to identify meaning of the rest of a message.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MsgCode {
    Hello,
    Error,
    EchoReq,
    EchoResp,
    Vendor,
    FeaturesReq,
    FeaturesResp,
    GetConfigReq,
    GetConfigResp,
    SetConfig,
    PacketIn,
    FlowRemoved,
    PortStatus,
    PacketOut,
    FlowMod,
    PortMod,
    StatsReq,
    StatsResp,
    BarrierReq,
    BarrierResp,
    QueueGetConfigReq,
    QueueGetConfigResp,
}

impl MsgCode {
    /// Map a header `typ` byte to a `MsgCode`, or `None` if the byte falls
    /// outside the range OpenFlow 1.0 defines.
    pub fn of_u8(typ: u8) -> Option<MsgCode> {
        let code = match typ {
            0 => MsgCode::Hello,
            1 => MsgCode::Error,
            2 => MsgCode::EchoReq,
            3 => MsgCode::EchoResp,
            4 => MsgCode::Vendor,
            5 => MsgCode::FeaturesReq,
            6 => MsgCode::FeaturesResp,
            7 => MsgCode::GetConfigReq,
            8 => MsgCode::GetConfigResp,
            9 => MsgCode::SetConfig,
            10 => MsgCode::PacketIn,
            11 => MsgCode::FlowRemoved,
            12 => MsgCode::PortStatus,
            13 => MsgCode::PacketOut,
            14 => MsgCode::FlowMod,
            15 => MsgCode::PortMod,
            16 => MsgCode::StatsReq,
            17 => MsgCode::StatsResp,
            18 => MsgCode::BarrierReq,
            19 => MsgCode::BarrierResp,
            20 => MsgCode::QueueGetConfigReq,
            21 => MsgCode::QueueGetConfigResp,
            _ => return None,
        };
        Some(code)
    }
}

// Wildcard bit positions of the ofp_match `wildcards` field. The nw_src and
// nw_dst sub-fields are 6 bits wide; a value of 32 or more wildcards the
// whole address.
const WC_IN_PORT: u32 = 0;
const WC_DL_VLAN: u32 = 1;
const WC_DL_SRC: u32 = 2;
const WC_DL_DST: u32 = 3;
const WC_DL_TYPE: u32 = 4;
const WC_NW_PROTO: u32 = 5;
const WC_TP_SRC: u32 = 6;
const WC_TP_DST: u32 = 7;
const WC_NW_SRC_SHIFT: u32 = 8;
const WC_NW_DST_SHIFT: u32 = 14;
const WC_DL_VLAN_PCP: u32 = 20;
const WC_NW_TOS: u32 = 21;

/// The `wildcards` value matching every packet.
pub const WC_ALL: u32 = (1 << 22) - 1;

/// Fields to match against flows. An unset field is wildcarded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pattern {
    pub in_port: Option<u16>,
    pub dl_src: Option<[u8; 6]>,
    pub dl_dst: Option<[u8; 6]>,
    pub dl_vlan: Option<u16>,
    pub dl_vlan_pcp: Option<u8>,
    pub dl_type: Option<u16>,
    pub nw_tos: Option<u8>,
    pub nw_proto: Option<u8>,
    pub nw_src: Option<Ipv4Addr>,
    pub nw_dst: Option<Ipv4Addr>,
    pub tp_src: Option<u16>,
    pub tp_dst: Option<u16>,
}

#[repr(packed)]
struct OfpMatch(u32, u16, [u8; 6], [u8; 6], u16, u8, u8, u16, u8, u8, u16, u32, u32, u16, u16);

impl Pattern {
    /// A pattern matching every packet.
    pub fn match_all() -> Pattern {
        Pattern::default()
    }

    pub fn size_of(_: &Pattern) -> usize {
        size_of::<OfpMatch>()
    }

    /// Compute the `wildcards` bitmap: a bit (or address sub-field) is set
    /// for every field the pattern leaves unset.
    fn wildcards(&self) -> u32 {
        let mut w = 0;
        w = bit(WC_IN_PORT, w, self.in_port.is_none());
        w = bit(WC_DL_VLAN, w, self.dl_vlan.is_none());
        w = bit(WC_DL_SRC, w, self.dl_src.is_none());
        w = bit(WC_DL_DST, w, self.dl_dst.is_none());
        w = bit(WC_DL_TYPE, w, self.dl_type.is_none());
        w = bit(WC_NW_PROTO, w, self.nw_proto.is_none());
        w = bit(WC_TP_SRC, w, self.tp_src.is_none());
        w = bit(WC_TP_DST, w, self.tp_dst.is_none());
        w |= Self::nw_wild(&self.nw_src) << WC_NW_SRC_SHIFT;
        w |= Self::nw_wild(&self.nw_dst) << WC_NW_DST_SHIFT;
        w = bit(WC_DL_VLAN_PCP, w, self.dl_vlan_pcp.is_none());
        w = bit(WC_NW_TOS, w, self.nw_tos.is_none());
        w
    }

    fn nw_wild(addr: &Option<Ipv4Addr>) -> u32 {
        match addr {
            Some(_) => 0,
            None => 32,
        }
    }

    fn marshal(p: Pattern, bytes: &mut Vec<u8>) {
        bytes.write_u32::<BigEndian>(p.wildcards()).unwrap();
        bytes.write_u16::<BigEndian>(p.in_port.unwrap_or(0)).unwrap();
        bytes.extend_from_slice(&p.dl_src.unwrap_or([0; 6]));
        bytes.extend_from_slice(&p.dl_dst.unwrap_or([0; 6]));
        bytes.write_u16::<BigEndian>(p.dl_vlan.unwrap_or(0)).unwrap();
        bytes.write_u8(p.dl_vlan_pcp.unwrap_or(0)).unwrap();
        bytes.write_u8(0).unwrap();
        bytes.write_u16::<BigEndian>(p.dl_type.unwrap_or(0)).unwrap();
        bytes.write_u8(p.nw_tos.unwrap_or(0)).unwrap();
        bytes.write_u8(p.nw_proto.unwrap_or(0)).unwrap();
        bytes.write_u16::<BigEndian>(0).unwrap();
        bytes.write_u32::<BigEndian>(p.nw_src.map_or(0, u32::from)).unwrap();
        bytes.write_u32::<BigEndian>(p.nw_dst.map_or(0, u32::from)).unwrap();
        bytes.write_u16::<BigEndian>(p.tp_src.unwrap_or(0)).unwrap();
        bytes.write_u16::<BigEndian>(p.tp_dst.unwrap_or(0)).unwrap();
    }
}

/// Port behavior.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PseudoPort {
    PhysicalPort(u16),
    InPort,
    Table,
    Normal,
    Flood,
    AllPorts,
    Controller(u16),
    Local,
}

#[repr(u16)]
enum OfpPort {
    InPort = 0xfff8,
    Table = 0xfff9,
    Normal = 0xfffa,
    Flood = 0xfffb,
    All = 0xfffc,
    Controller = 0xfffd,
    Local = 0xfffe,
    None = 0xffff,
}

impl PseudoPort {
    fn marshal(pp: PseudoPort, bytes: &mut Vec<u8>) {
        let code = match pp {
            PseudoPort::PhysicalPort(p) => p,
            PseudoPort::InPort => OfpPort::InPort as u16,
            PseudoPort::Table => OfpPort::Table as u16,
            PseudoPort::Normal => OfpPort::Normal as u16,
            PseudoPort::Flood => OfpPort::Flood as u16,
            PseudoPort::AllPorts => OfpPort::All as u16,
            PseudoPort::Controller(_) => OfpPort::Controller as u16,
            PseudoPort::Local => OfpPort::Local as u16,
        };
        bytes.write_u16::<BigEndian>(code).unwrap()
    }
}

/// Actions associated with flows and packets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Action {
    Output(PseudoPort),
}

#[repr(packed)]
struct OfpActionOutput(u16, u16, u16, u16);

#[repr(u16)]
enum OfpActionType {
    Output,
}

impl Action {
    fn size_of(a: &Action) -> usize {
        match *a {
            Action::Output(_) => size_of::<OfpActionOutput>(),
        }
    }

    fn size_of_sequence(actions: &[Action]) -> usize {
        actions.iter().map(Action::size_of).sum()
    }

    fn marshal(act: Action, bytes: &mut Vec<u8>) {
        match act {
            Action::Output(pp) => {
                bytes.write_u16::<BigEndian>(OfpActionType::Output as u16).unwrap();
                bytes.write_u16::<BigEndian>(Action::size_of(&act) as u16).unwrap();
                PseudoPort::marshal(pp, bytes);
                // max_len is only meaningful for output-to-controller.
                bytes.write_u16::<BigEndian>(match pp {
                        PseudoPort::Controller(max_len) => max_len,
                        _ => 0,
                    })
                    .unwrap()
            }
        }
    }
}

/// How long before a flow entry expires.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Timeout {
    Permanent,
    ExpiresAfter(u16),
}

impl Timeout {
    fn to_int(tm: Timeout) -> u16 {
        match tm {
            Timeout::Permanent => 0,
            Timeout::ExpiresAfter(d) => d,
        }
    }
}

/// Type of modification to perform on a flow table.
#[repr(u16)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FlowModCmd {
    AddFlow,
    ModFlow,
    ModStrictFlow,
    DeleteFlow,
    DeleteStrictFlow,
}

/// Represents modifications to a flow table from the controller.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowMod {
    pub command: FlowModCmd,
    pub pattern: Pattern,
    pub priority: u16,
    pub actions: Vec<Action>,
    pub cookie: u64,
    pub idle_timeout: Timeout,
    pub hard_timeout: Timeout,
    pub notify_when_removed: bool,
    pub apply_to_packet: Option<u32>,
    pub out_port: Option<PseudoPort>,
    pub check_overlap: bool,
}

/// Default priority of a flow entry (OFP_DEFAULT_PRIORITY).
pub const DEFAULT_PRIORITY: u16 = 0x8000;

#[repr(packed)]
struct OfpFlowMod(u64, u16, u16, u16, u16, u32, u16, u16);

impl FlowMod {
    pub fn size_of(msg: &FlowMod) -> usize {
        Pattern::size_of(&msg.pattern) + size_of::<OfpFlowMod>() +
        Action::size_of_sequence(&msg.actions)
    }

    fn flags_to_int(check_overlap: bool, notify_when_removed: bool) -> u16 {
        (if check_overlap { 1 << 1 } else { 0 }) | (if notify_when_removed { 1 << 0 } else { 0 })
    }

    fn marshal(fm: FlowMod, bytes: &mut Vec<u8>) {
        Pattern::marshal(fm.pattern, bytes);
        bytes.write_u64::<BigEndian>(fm.cookie).unwrap();
        bytes.write_u16::<BigEndian>(fm.command as u16).unwrap();
        bytes.write_u16::<BigEndian>(Timeout::to_int(fm.idle_timeout)).unwrap();
        bytes.write_u16::<BigEndian>(Timeout::to_int(fm.hard_timeout)).unwrap();
        bytes.write_u16::<BigEndian>(fm.priority).unwrap();
        bytes.write_i32::<BigEndian>(match fm.apply_to_packet {
                None => -1,
                Some(buf_id) => buf_id as i32,
            })
            .unwrap();
        match fm.out_port {
            None => bytes.write_u16::<BigEndian>(OfpPort::None as u16).unwrap(),
            Some(p) => PseudoPort::marshal(p, bytes),
        }
        bytes.write_u16::<BigEndian>(FlowMod::flags_to_int(fm.check_overlap,
                                                           fm.notify_when_removed))
            .unwrap();
        for act in fm.actions {
            Action::marshal(act, bytes)
        }
    }
}

/// The data associated with a packet received by the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Buffered(u32, Vec<u8>),
    NotBuffered(Vec<u8>),
}

impl Payload {
    pub fn size_of(payload: &Payload) -> usize {
        match *payload {
            Payload::Buffered(_, ref buf) |
            Payload::NotBuffered(ref buf) => buf.len(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match *self {
            Payload::Buffered(_, ref buf) |
            Payload::NotBuffered(ref buf) => buf,
        }
    }
}

/// The reason a packet arrives at the controller.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PacketInReason {
    NoMatch,
    ExplicitSend,
}

/// Represents packets received by the datapath and sent to the controller.
#[derive(Clone, Debug, PartialEq)]
pub struct PacketIn {
    pub input_payload: Payload,
    pub total_len: u16,
    pub port: u16,
    pub reason: PacketInReason,
}

#[repr(packed)]
struct OfpPacketIn(i32, u16, u16, u8, u8);

impl PacketIn {
    pub fn size_of(pi: &PacketIn) -> usize {
        size_of::<OfpPacketIn>() + Payload::size_of(&pi.input_payload)
    }

    fn parse(buf: &[u8]) -> Result<PacketIn> {
        // The body length is peer-controlled; reject short bodies before
        // consuming past the buffer.
        if buf.len() < size_of::<OfpPacketIn>() {
            return Err(Error::TruncatedMessage {
                expected: size_of::<OfpPacketIn>(),
                got: buf.len(),
            });
        }
        let mut bytes = Cursor::new(buf);
        let buf_id = match bytes.read_i32::<BigEndian>()? {
            -1 => None,
            n => Some(n as u32),
        };
        let total_len = bytes.read_u16::<BigEndian>()?;
        let port = bytes.read_u16::<BigEndian>()?;
        let reason = match bytes.read_u8()? {
            0 => PacketInReason::NoMatch,
            _ => PacketInReason::ExplicitSend,
        };
        bytes.consume(1);
        let frame = buf[bytes.position() as usize..].to_vec();
        let payload = match buf_id {
            None => Payload::NotBuffered(frame),
            Some(n) => Payload::Buffered(n, frame),
        };
        Ok(PacketIn {
            input_payload: payload,
            total_len,
            port,
            reason,
        })
    }
}

/// Description of a physical port. Feature bitmaps beyond the up/down bits
/// are not modeled; the application only reports port transitions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PortDesc {
    pub port_no: u16,
    pub hw_addr: [u8; 6],
    pub name: String,
    pub admin_down: bool,
    pub link_down: bool,
}

#[repr(packed)]
struct OfpPhyPort(u16, [u8; 6], [u8; 16], u32, u32, u32, u32, u32, u32);

impl PortDesc {
    fn size_of(_: &PortDesc) -> usize {
        size_of::<OfpPhyPort>()
    }

    fn parse(bytes: &mut Cursor<&[u8]>) -> Result<PortDesc> {
        let port_no = bytes.read_u16::<BigEndian>()?;
        let mut hw_addr = [0; 6];
        for b in hw_addr.iter_mut() {
            *b = bytes.read_u8()?;
        }
        let name = {
            let mut raw = [0; 16];
            for b in raw.iter_mut() {
                *b = bytes.read_u8()?;
            }
            let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
            String::from_utf8_lossy(&raw[..end]).into_owned()
        };
        let config = bytes.read_u32::<BigEndian>()?;
        let state = bytes.read_u32::<BigEndian>()?;
        // curr, advertised, supported, peer feature words.
        bytes.consume(16);
        Ok(PortDesc {
            port_no,
            hw_addr,
            name,
            admin_down: test_bit(0, config),
            link_down: test_bit(0, state),
        })
    }
}

/// Switch features, sent in reply to a features request during the handshake.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwitchFeatures {
    pub datapath_id: u64,
    pub num_buffers: u32,
    pub num_tables: u8,
    pub ports: Vec<PortDesc>,
}

#[repr(packed)]
struct OfpSwitchFeatures(u64, u32, u8, [u8; 3], u32, u32);

impl SwitchFeatures {
    pub fn size_of(sf: &SwitchFeatures) -> usize {
        let pds: usize = sf.ports.iter().map(PortDesc::size_of).sum();
        size_of::<OfpSwitchFeatures>() + pds
    }

    fn parse(buf: &[u8]) -> Result<SwitchFeatures> {
        if buf.len() < size_of::<OfpSwitchFeatures>() {
            return Err(Error::TruncatedMessage {
                expected: size_of::<OfpSwitchFeatures>(),
                got: buf.len(),
            });
        }
        let mut bytes = Cursor::new(buf);
        let datapath_id = bytes.read_u64::<BigEndian>()?;
        let num_buffers = bytes.read_u32::<BigEndian>()?;
        let num_tables = bytes.read_u8()?;
        bytes.consume(3);
        // Capability and supported-action bitmaps are not used by the
        // application.
        bytes.consume(8);
        let ports = {
            let remaining = buf.len() - bytes.position() as usize;
            let num_ports = remaining / size_of::<OfpPhyPort>();
            let mut v = Vec::with_capacity(num_ports);
            for _ in 0..num_ports {
                v.push(PortDesc::parse(&mut bytes)?)
            }
            v
        };
        Ok(SwitchFeatures {
            datapath_id,
            num_buffers,
            num_tables,
            ports,
        })
    }
}

/// What changed about a physical port.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PortReason {
    PortAdd,
    PortDelete,
    PortModify,
    /// A reason byte outside the range OpenFlow 1.0 defines.
    Unknown(u8),
}

/// A physical port has changed in the datapath.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PortStatus {
    pub reason: PortReason,
    pub desc: PortDesc,
}

impl PortStatus {
    pub fn size_of(_: &PortStatus) -> usize {
        8 + size_of::<OfpPhyPort>()
    }

    fn parse(buf: &[u8]) -> Result<PortStatus> {
        let min_len = 8 + size_of::<OfpPhyPort>();
        if buf.len() < min_len {
            return Err(Error::TruncatedMessage {
                expected: min_len,
                got: buf.len(),
            });
        }
        let mut bytes = Cursor::new(buf);
        let reason = match bytes.read_u8()? {
            0 => PortReason::PortAdd,
            1 => PortReason::PortDelete,
            2 => PortReason::PortModify,
            r => PortReason::Unknown(r),
        };
        bytes.consume(7);
        let desc = PortDesc::parse(&mut bytes)?;
        Ok(PortStatus { reason, desc })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marshal_pattern(p: Pattern) -> Vec<u8> {
        let mut bytes = vec![];
        Pattern::marshal(p, &mut bytes);
        bytes
    }

    fn wildcards_of(bytes: &[u8]) -> u32 {
        u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    #[test]
    fn match_all_wildcards_everything() {
        let bytes = marshal_pattern(Pattern::match_all());
        assert_eq!(bytes.len(), 40);
        assert_eq!(wildcards_of(&bytes), WC_ALL);
        assert!(bytes[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn exact_fields_clear_their_wildcard_bits() {
        let pattern = Pattern {
            in_port: Some(3),
            dl_type: Some(0x0800),
            nw_proto: Some(6),
            nw_src: Some(Ipv4Addr::new(10, 0, 0, 1)),
            tp_src: Some(4321),
            ..Pattern::match_all()
        };
        let bytes = marshal_pattern(pattern);
        let w = wildcards_of(&bytes);
        assert!(!test_bit(WC_IN_PORT, w));
        assert!(!test_bit(WC_DL_TYPE, w));
        assert!(!test_bit(WC_NW_PROTO, w));
        assert!(!test_bit(WC_TP_SRC, w));
        // Exact source address: sub-field fully cleared.
        assert_eq!((w >> WC_NW_SRC_SHIFT) & 0x3f, 0);
        // Untouched fields stay wildcarded.
        assert!(test_bit(WC_DL_VLAN, w));
        assert!(test_bit(WC_TP_DST, w));
        assert_eq!((w >> WC_NW_DST_SHIFT) & 0x3f, 32);
        // in_port at offset 4, nw_src at offset 28, tp_src at offset 36.
        assert_eq!(&bytes[4..6], &3u16.to_be_bytes());
        assert_eq!(&bytes[28..32], &u32::from(Ipv4Addr::new(10, 0, 0, 1)).to_be_bytes());
        assert_eq!(&bytes[36..38], &4321u16.to_be_bytes());
    }

    #[test]
    fn flow_mod_add_layout() {
        let fm = FlowMod {
            command: FlowModCmd::AddFlow,
            pattern: Pattern {
                dl_type: Some(0x0806),
                ..Pattern::match_all()
            },
            priority: 0,
            actions: vec![Action::Output(PseudoPort::Flood)],
            cookie: 0,
            idle_timeout: Timeout::Permanent,
            hard_timeout: Timeout::Permanent,
            notify_when_removed: false,
            apply_to_packet: None,
            out_port: None,
            check_overlap: false,
        };
        assert_eq!(FlowMod::size_of(&fm), 40 + 24 + 8);
        let mut bytes = vec![];
        FlowMod::marshal(fm, &mut bytes);
        assert_eq!(bytes.len(), 72);
        // command directly after the 40-byte match and 8-byte cookie.
        assert_eq!(&bytes[48..50], &(FlowModCmd::AddFlow as u16).to_be_bytes());
        // permanent timeouts and priority 0.
        assert_eq!(&bytes[50..56], &[0; 6]);
        // no buffer, out_port OFPP_NONE, no flags.
        assert_eq!(&bytes[56..60], &(-1i32).to_be_bytes());
        assert_eq!(&bytes[60..62], &0xffffu16.to_be_bytes());
        assert_eq!(&bytes[62..64], &[0, 0]);
        // single output action: type 0, len 8, port OFPP_FLOOD, max_len 0.
        assert_eq!(&bytes[64..72], &[0, 0, 0, 8, 0xff, 0xfb, 0, 0]);
    }

    #[test]
    fn flow_mod_flags_carry_send_flow_rem() {
        let fm = FlowMod {
            command: FlowModCmd::AddFlow,
            pattern: Pattern::match_all(),
            priority: DEFAULT_PRIORITY,
            actions: vec![],
            cookie: 0,
            idle_timeout: Timeout::Permanent,
            hard_timeout: Timeout::Permanent,
            notify_when_removed: true,
            apply_to_packet: None,
            out_port: None,
            check_overlap: false,
        };
        let mut bytes = vec![];
        FlowMod::marshal(fm, &mut bytes);
        assert_eq!(&bytes[54..56], &DEFAULT_PRIORITY.to_be_bytes());
        assert_eq!(&bytes[62..64], &1u16.to_be_bytes());
    }

    #[test]
    fn packet_in_parse_strips_padding() {
        let mut buf = vec![];
        buf.extend_from_slice(&(-1i32).to_be_bytes());
        buf.extend_from_slice(&60u16.to_be_bytes());
        buf.extend_from_slice(&7u16.to_be_bytes());
        buf.push(0); // reason: no match
        buf.push(0); // pad
        buf.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let pi = PacketIn::parse(&buf).unwrap();
        assert_eq!(pi.port, 7);
        assert_eq!(pi.total_len, 60);
        assert_eq!(pi.reason, PacketInReason::NoMatch);
        assert_eq!(pi.input_payload, Payload::NotBuffered(vec![0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn truncated_packet_in_is_an_error() {
        // One byte short of the fixed packet-in prelude.
        assert!(matches!(
            PacketIn::parse(&[0u8; 9]),
            Err(Error::TruncatedMessage { expected: 10, got: 9 })
        ));
    }

    #[test]
    fn truncated_switch_features_is_an_error() {
        assert!(matches!(
            SwitchFeatures::parse(&[0u8; 13]),
            Err(Error::TruncatedMessage { expected: 24, got: 13 })
        ));
        // A full prelude with no port descriptions parses.
        assert!(SwitchFeatures::parse(&[0u8; 24]).is_ok());
    }

    #[test]
    fn truncated_port_status_is_an_error() {
        assert!(matches!(
            PortStatus::parse(&[0u8; 20]),
            Err(Error::TruncatedMessage { .. })
        ));
    }

    #[test]
    fn port_status_parse() {
        let mut buf = vec![1]; // reason: delete
        buf.extend_from_slice(&[0; 7]);
        buf.extend_from_slice(&5u16.to_be_bytes());
        buf.extend_from_slice(&[0xaa; 6]);
        buf.extend_from_slice(b"eth5\0\0\0\0\0\0\0\0\0\0\0\0");
        buf.extend_from_slice(&0u32.to_be_bytes()); // config
        buf.extend_from_slice(&1u32.to_be_bytes()); // state: link down
        buf.extend_from_slice(&[0; 16]); // feature words
        let ps = PortStatus::parse(&buf).unwrap();
        assert_eq!(ps.reason, PortReason::PortDelete);
        assert_eq!(ps.desc.port_no, 5);
        assert_eq!(ps.desc.name, "eth5");
        assert!(ps.desc.link_down);
        assert!(!ps.desc.admin_down);
    }
}
