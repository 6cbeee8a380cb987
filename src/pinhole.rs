//! The pinhole controller application.
//!
//! Manages a single switch fronting one host. On connect the switch's flow
//! table is cleared and two baseline rules are installed: flood ARP, and
//! forward everything arriving on the host port out a fixed egress port. Each
//! packet-in then installs a narrow "pinhole" rule keyed on the packet's IP
//! protocol, source address, and (for TCP/UDP) source port, steering that
//! flow toward the host port. Rules are permanent; they survive until the
//! next reconnect wipes the table.

use std::net::{Ipv4Addr, TcpStream};

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::ofp_controller::openflow0x01::OF0x01Controller;
use crate::openflow0x01::message::{add_flow, delete_all_flows};
use crate::openflow0x01::{
    Action, FlowMod, PacketIn, Pattern, PortReason, PortStatus, PseudoPort, SwitchFeatures,
    DEFAULT_PRIORITY,
};
use crate::packet::{self, EthernetFrame, Nw};

/// Ports of the one switch this controller manages.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SwitchConfig {
    /// Port the host hangs off of; pinhole rules forward toward it.
    pub host_port: u16,
    /// Egress port for traffic arriving from the host.
    pub out_port: u16,
}

impl Default for SwitchConfig {
    fn default() -> SwitchConfig {
        SwitchConfig {
            host_port: 2,
            out_port: 1,
        }
    }
}

/// The header fields a pinhole rule keys on, derived fresh from each
/// packet-in. Never persisted or compared across events.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowSpec {
    pub dl_type: u16,
    pub nw_proto: u8,
    pub nw_src: Ipv4Addr,
    pub tp_src: Option<u16>,
}

impl FlowSpec {
    /// Derive a flow spec from a classified frame. Returns `None` for frames
    /// no rule is installed for: link-layer discovery and anything that is
    /// not IPv4.
    pub fn of_frame(frame: &EthernetFrame) -> Option<FlowSpec> {
        if frame.is_lldp() {
            return None;
        }
        match frame.nw {
            Nw::Ipv4(ref ip) => Some(FlowSpec {
                dl_type: packet::ETH_TYPE_IP,
                nw_proto: ip.proto,
                nw_src: ip.src,
                tp_src: ip.transport.src_port(),
            }),
            Nw::Other(_) => None,
        }
    }

    /// Build the match for this flow's rule. ICMP flows match on ingress
    /// port, ethertype, protocol, and source address; TCP and UDP flows
    /// additionally pin the source transport port. Any other IP protocol is
    /// unsupported and installs nothing.
    pub fn to_pattern(&self, in_port: u16) -> Result<Pattern> {
        let mut pattern = Pattern {
            in_port: Some(in_port),
            dl_type: Some(self.dl_type),
            nw_proto: Some(self.nw_proto),
            nw_src: Some(self.nw_src),
            ..Pattern::match_all()
        };
        match self.nw_proto {
            packet::IP_PROTO_ICMP => (),
            // A rule without the source port would match the whole
            // protocol from that source.
            packet::IP_PROTO_TCP | packet::IP_PROTO_UDP => match self.tp_src {
                Some(port) => pattern.tp_src = Some(port),
                None => return Err(Error::TruncatedTransport(self.nw_proto)),
            },
            other => return Err(Error::UnsupportedProtocol(other)),
        }
        Ok(pattern)
    }
}

/// Controller application installing per-flow pinhole rules on one switch.
pub struct PinholeSwitch {
    config: SwitchConfig,
}

impl PinholeSwitch {
    pub fn new(config: SwitchConfig) -> PinholeSwitch {
        PinholeSwitch { config }
    }

    /// The flow-mods (re)installed on every switch connect, in send order:
    /// clear the table, flood ARP, forward host ingress out `out_port`.
    pub fn baseline_flow_mods(config: &SwitchConfig) -> Vec<FlowMod> {
        let arp_flood = {
            let mut m = Pattern::match_all();
            m.dl_type = Some(packet::ETH_TYPE_ARP);
            add_flow(0, m, vec![Action::Output(PseudoPort::Flood)])
        };
        let host_egress = {
            let mut m = Pattern::match_all();
            m.in_port = Some(config.host_port);
            add_flow(0, m, vec![Action::Output(PseudoPort::PhysicalPort(config.out_port))])
        };
        vec![delete_all_flows(), arp_flood, host_egress]
    }

    /// Pinhole rule for one packet-in, or `None` when the frame is one the
    /// controller ignores. The rule is permanent, at default priority, with
    /// OFPFF_SEND_FLOW_REM set.
    pub fn flow_mod_for_packet(config: &SwitchConfig, pkt: &PacketIn) -> Result<Option<FlowMod>> {
        let frame = match EthernetFrame::parse(pkt.input_payload.bytes()) {
            Some(frame) => frame,
            None => return Ok(None),
        };
        let spec = match FlowSpec::of_frame(&frame) {
            Some(spec) => spec,
            None => return Ok(None),
        };
        let pattern = spec.to_pattern(pkt.port)?;
        let actions = vec![Action::Output(PseudoPort::PhysicalPort(config.host_port))];
        let mut flow_mod = add_flow(DEFAULT_PRIORITY, pattern, actions);
        flow_mod.notify_when_removed = true;
        Ok(Some(flow_mod))
    }
}

impl OF0x01Controller for PinholeSwitch {
    fn switch_connected(&mut self,
                        sw: u64,
                        _feats: SwitchFeatures,
                        stream: &mut TcpStream)
                        -> Result<()> {
        for flow_mod in Self::baseline_flow_mods(&self.config) {
            Self::send_flow_mod(0, flow_mod, stream)?;
        }
        info!("switch {:016x}: table cleared, baseline rules installed", sw);
        Ok(())
    }

    fn switch_disconnected(&mut self, sw: u64) {
        info!("switch {:016x} disconnected", sw);
    }

    fn packet_in(&mut self,
                 _sw: u64,
                 xid: u32,
                 pkt: PacketIn,
                 stream: &mut TcpStream)
                 -> Result<()> {
        let port = pkt.port;
        match Self::flow_mod_for_packet(&self.config, &pkt)? {
            Some(flow_mod) => {
                let src = flow_mod.pattern.nw_src;
                Self::send_flow_mod(xid, flow_mod, stream)?;
                if let Some(src) = src {
                    info!("packet received on port {} from {}", port, src);
                }
            }
            None => debug!("ignoring frame on port {}", port),
        }
        Ok(())
    }

    fn port_status(&mut self, _sw: u64, status: PortStatus) {
        let port_no = status.desc.port_no;
        match status.reason {
            PortReason::PortAdd => info!("port added {}", port_no),
            PortReason::PortDelete => info!("port deleted {}", port_no),
            PortReason::PortModify => info!("port modified {}", port_no),
            PortReason::Unknown(r) => warn!("illegal port state {} {}", port_no, r),
        }
    }
}
