//! Classifier for packet-in payloads. Parses only as deep as the flow rules
//! need: Ethernet framing, the IPv4 header, and transport source/destination
//! ports.

use std::io::{BufRead, Cursor};
use std::net::Ipv4Addr;

use byteorder::{BigEndian, ReadBytesExt};

pub const ETH_TYPE_IP: u16 = 0x0800;
pub const ETH_TYPE_ARP: u16 = 0x0806;
pub const ETH_TYPE_VLAN: u16 = 0x8100;
pub const ETH_TYPE_LLDP: u16 = 0x88cc;

pub const IP_PROTO_ICMP: u8 = 1;
pub const IP_PROTO_TCP: u8 = 6;
pub const IP_PROTO_UDP: u8 = 17;

/// Transport header of an IPv4 packet.
#[derive(Clone, Debug, PartialEq)]
pub enum Transport {
    Icmp { typ: u8, code: u8 },
    Tcp { src: u16, dst: u16 },
    Udp { src: u16, dst: u16 },
    /// Protocol number of a transport the classifier does not parse, or a
    /// header too short to carry one.
    Other(u8),
}

impl Transport {
    /// Source transport port, for protocols that have one.
    pub fn src_port(&self) -> Option<u16> {
        match *self {
            Transport::Tcp { src, .. } |
            Transport::Udp { src, .. } => Some(src),
            Transport::Icmp { .. } |
            Transport::Other(_) => None,
        }
    }

    fn parse(proto: u8, bytes: &mut Cursor<&[u8]>) -> Transport {
        let remaining = bytes.get_ref().len() - bytes.position() as usize;
        match proto {
            IP_PROTO_ICMP if remaining >= 4 => {
                let typ = bytes.read_u8().unwrap();
                let code = bytes.read_u8().unwrap();
                Transport::Icmp { typ, code }
            }
            IP_PROTO_TCP | IP_PROTO_UDP if remaining >= 4 => {
                let src = bytes.read_u16::<BigEndian>().unwrap();
                let dst = bytes.read_u16::<BigEndian>().unwrap();
                match proto {
                    IP_PROTO_TCP => Transport::Tcp { src, dst },
                    _ => Transport::Udp { src, dst },
                }
            }
            _ => Transport::Other(proto),
        }
    }
}

/// IPv4 header of a packet.
#[derive(Clone, Debug, PartialEq)]
pub struct Ipv4Header {
    pub proto: u8,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    pub transport: Transport,
}

impl Ipv4Header {
    const MIN_LEN: usize = 20;

    fn parse(bytes: &mut Cursor<&[u8]>) -> Option<Ipv4Header> {
        let remaining = bytes.get_ref().len() - bytes.position() as usize;
        if remaining < Self::MIN_LEN {
            return None;
        }
        let vhl = bytes.read_u8().unwrap();
        if (vhl >> 4) != 4 {
            return None;
        }
        let header_len = ((vhl & 0x0f) as usize) * 4;
        if header_len < Self::MIN_LEN || remaining < header_len {
            return None;
        }
        // tos, total length, ident, flags/fragment, ttl.
        bytes.consume(8);
        let proto = bytes.read_u8().unwrap();
        bytes.consume(2); // checksum
        let src = Ipv4Addr::from(bytes.read_u32::<BigEndian>().unwrap());
        let dst = Ipv4Addr::from(bytes.read_u32::<BigEndian>().unwrap());
        bytes.consume(header_len - Self::MIN_LEN); // options
        let transport = Transport::parse(proto, bytes);
        Some(Ipv4Header {
            proto,
            src,
            dst,
            transport,
        })
    }
}

/// Network-layer view of a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Nw {
    Ipv4(Ipv4Header),
    /// Anything that is not parseable IPv4, keyed by ethertype. ARP and LLDP
    /// land here; the application matches them by ethertype alone.
    Other(u16),
}

/// An Ethernet frame, the top-level view of a packet-in payload.
#[derive(Clone, Debug, PartialEq)]
pub struct EthernetFrame {
    pub dl_src: [u8; 6],
    pub dl_dst: [u8; 6],
    pub dl_vlan: Option<u16>,
    pub ethertype: u16,
    pub nw: Nw,
}

impl EthernetFrame {
    /// Parse a frame from a packet-in payload. Returns `None` for frames too
    /// short to carry an Ethernet header.
    pub fn parse(buf: &[u8]) -> Option<EthernetFrame> {
        if buf.len() < 14 {
            return None;
        }
        let mut bytes = Cursor::new(buf);
        let mut dl_dst = [0; 6];
        let mut dl_src = [0; 6];
        for b in dl_dst.iter_mut() {
            *b = bytes.read_u8().unwrap();
        }
        for b in dl_src.iter_mut() {
            *b = bytes.read_u8().unwrap();
        }
        let mut ethertype = bytes.read_u16::<BigEndian>().unwrap();
        let dl_vlan = if ethertype == ETH_TYPE_VLAN {
            if buf.len() < 18 {
                return None;
            }
            let tci = bytes.read_u16::<BigEndian>().unwrap();
            ethertype = bytes.read_u16::<BigEndian>().unwrap();
            Some(tci & 0x0fff)
        } else {
            None
        };
        let nw = match ethertype {
            ETH_TYPE_IP => match Ipv4Header::parse(&mut bytes) {
                Some(ip) => Nw::Ipv4(ip),
                None => Nw::Other(ethertype),
            },
            t => Nw::Other(t),
        };
        Some(EthernetFrame {
            dl_src,
            dl_dst,
            dl_vlan,
            ethertype,
            nw,
        })
    }

    /// Whether this is a link-layer discovery frame, which the controller
    /// ignores entirely.
    pub fn is_lldp(&self) -> bool {
        self.ethertype == ETH_TYPE_LLDP
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build an Ethernet frame around the given ethertype and payload.
    pub(crate) fn ethernet(ethertype: u16, payload: &[u8]) -> Vec<u8> {
        let mut frame = vec![];
        frame.extend_from_slice(&[0x02, 0, 0, 0, 0, 0x01]); // dst
        frame.extend_from_slice(&[0x02, 0, 0, 0, 0, 0x02]); // src
        frame.extend_from_slice(&ethertype.to_be_bytes());
        frame.extend_from_slice(payload);
        frame
    }

    /// Build an IPv4 packet with no options around the given transport bytes.
    pub(crate) fn ipv4(proto: u8, src: [u8; 4], dst: [u8; 4], transport: &[u8]) -> Vec<u8> {
        let mut pkt = vec![0x45, 0x00];
        pkt.extend_from_slice(&((20 + transport.len()) as u16).to_be_bytes());
        pkt.extend_from_slice(&[0, 0, 0, 0]); // ident, flags/frag
        pkt.push(64); // ttl
        pkt.push(proto);
        pkt.extend_from_slice(&[0, 0]); // checksum
        pkt.extend_from_slice(&src);
        pkt.extend_from_slice(&dst);
        pkt.extend_from_slice(transport);
        pkt
    }

    pub(crate) fn tcp_segment(src: u16, dst: u16) -> Vec<u8> {
        let mut seg = vec![];
        seg.extend_from_slice(&src.to_be_bytes());
        seg.extend_from_slice(&dst.to_be_bytes());
        seg.extend_from_slice(&[0; 16]);
        seg
    }

    #[test]
    fn classifies_tcp() {
        let buf = ethernet(ETH_TYPE_IP,
                           &ipv4(IP_PROTO_TCP, [10, 0, 0, 1], [10, 0, 0, 2],
                                 &tcp_segment(44000, 80)));
        let frame = EthernetFrame::parse(&buf).unwrap();
        assert_eq!(frame.ethertype, ETH_TYPE_IP);
        match frame.nw {
            Nw::Ipv4(ip) => {
                assert_eq!(ip.proto, IP_PROTO_TCP);
                assert_eq!(ip.src, Ipv4Addr::new(10, 0, 0, 1));
                assert_eq!(ip.transport.src_port(), Some(44000));
            }
            other => panic!("expected IPv4, got {:?}", other),
        }
    }

    #[test]
    fn classifies_udp_and_icmp() {
        let mut seg = vec![];
        seg.extend_from_slice(&5353u16.to_be_bytes()); // src port
        seg.extend_from_slice(&53u16.to_be_bytes()); // dst port
        seg.extend_from_slice(&[0, 8, 0, 0]); // length, checksum
        let buf = ethernet(ETH_TYPE_IP,
                           &ipv4(IP_PROTO_UDP, [192, 168, 1, 9], [192, 168, 1, 1], &seg));
        let frame = EthernetFrame::parse(&buf).unwrap();
        match frame.nw {
            Nw::Ipv4(ip) => assert_eq!(ip.transport.src_port(), Some(5353)),
            other => panic!("expected IPv4, got {:?}", other),
        }

        let buf = ethernet(ETH_TYPE_IP,
                           &ipv4(IP_PROTO_ICMP, [10, 0, 0, 1], [10, 0, 0, 2],
                                 &[8, 0, 0, 0, 0, 0, 0, 0]));
        let frame = EthernetFrame::parse(&buf).unwrap();
        match frame.nw {
            Nw::Ipv4(ip) => {
                assert_eq!(ip.transport, Transport::Icmp { typ: 8, code: 0 });
                assert_eq!(ip.transport.src_port(), None);
            }
            other => panic!("expected IPv4, got {:?}", other),
        }
    }

    #[test]
    fn arp_is_not_ipv4() {
        let buf = ethernet(ETH_TYPE_ARP, &[0; 28]);
        let frame = EthernetFrame::parse(&buf).unwrap();
        assert_eq!(frame.nw, Nw::Other(ETH_TYPE_ARP));
        assert!(!frame.is_lldp());
    }

    #[test]
    fn lldp_is_flagged() {
        let buf = ethernet(ETH_TYPE_LLDP, &[0; 8]);
        let frame = EthernetFrame::parse(&buf).unwrap();
        assert!(frame.is_lldp());
    }

    #[test]
    fn vlan_tag_is_unwrapped() {
        let mut payload = vec![];
        payload.extend_from_slice(&0x0064u16.to_be_bytes()); // vlan 100
        payload.extend_from_slice(&ETH_TYPE_IP.to_be_bytes());
        payload.extend_from_slice(&ipv4(IP_PROTO_ICMP, [10, 0, 0, 1], [10, 0, 0, 2],
                                        &[0, 0, 0, 0]));
        let buf = ethernet(ETH_TYPE_VLAN, &payload);
        let frame = EthernetFrame::parse(&buf).unwrap();
        assert_eq!(frame.dl_vlan, Some(100));
        assert_eq!(frame.ethertype, ETH_TYPE_IP);
        assert!(matches!(frame.nw, Nw::Ipv4(_)));
    }

    #[test]
    fn truncated_frames_do_not_parse() {
        assert_eq!(EthernetFrame::parse(&[0; 10]), None);
        // IPv4 ethertype but a runt payload falls back to Other.
        let buf = ethernet(ETH_TYPE_IP, &[0x45, 0x00]);
        let frame = EthernetFrame::parse(&buf).unwrap();
        assert_eq!(frame.nw, Nw::Other(ETH_TYPE_IP));
    }
}
