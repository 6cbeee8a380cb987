use std::net::TcpStream;

use crate::error::Result;
use crate::ofp_message::OfpMessage;

/// OpenFlow Controller
///
/// Version-agnostic API for implementing an OpenFlow controller.
pub trait OfpController {
    /// OpenFlow message type supporting the same protocol version as the controller.
    type Message: OfpMessage;

    /// Send a message to the switch associated with the given `TcpStream`.
    fn send_message(xid: u32, msg: Self::Message, stream: &mut TcpStream) -> Result<()>;
    /// Perform the handshake and run the event loop reading incoming messages
    /// from the client stream until it disconnects.
    fn handle_client_connected(&mut self, stream: &mut TcpStream) -> Result<()>;
}

pub mod openflow0x01 {
    use std::io::{self, Read, Write};
    use std::net::TcpStream;

    use log::{debug, error, info, warn};

    use super::OfpController;
    use crate::error::{Error, Result};
    use crate::ofp_header::OfpHeader;
    use crate::ofp_message::OfpMessage;
    use crate::openflow0x01::message::Message;
    use crate::openflow0x01::{FlowMod, PacketIn, PortStatus, SwitchFeatures};

    /// Callback interface of an OpenFlow 1.0 controller application.
    ///
    /// Handlers run to completion, non-reentrantly, on the connection's
    /// thread as events arrive. A failed `packet_in` is logged and aborts
    /// only that handler invocation; i/o failures end the connection loop.
    pub trait OF0x01Controller {
        /// A switch completed the handshake; `sw` is its datapath id.
        fn switch_connected(&mut self,
                            sw: u64,
                            feats: SwitchFeatures,
                            stream: &mut TcpStream)
                            -> Result<()>;
        /// The connection to switch `sw` went away.
        fn switch_disconnected(&mut self, sw: u64);
        /// A packet missed the flow table and was forwarded to the controller.
        fn packet_in(&mut self,
                     sw: u64,
                     xid: u32,
                     pkt: PacketIn,
                     stream: &mut TcpStream)
                     -> Result<()>;
        /// A physical port on switch `sw` changed.
        fn port_status(&mut self, sw: u64, status: PortStatus);

        /// Send a flow-mod to the switch on the given stream.
        fn send_flow_mod(xid: u32, flow_mod: FlowMod, stream: &mut TcpStream) -> Result<()>
        where
            Self: Sized,
        {
            <Self as OfpController>::send_message(xid, Message::FlowMod(flow_mod), stream)
        }
    }

    fn read_header(stream: &mut TcpStream) -> io::Result<OfpHeader> {
        let mut buf = [0u8; 8];
        stream.read_exact(&mut buf)?;
        Ok(OfpHeader::parse(buf))
    }

    impl<T: OF0x01Controller> OfpController for T {
        type Message = Message;

        fn send_message(xid: u32, msg: Message, stream: &mut TcpStream) -> Result<()> {
            stream.write_all(&Message::marshal(xid, msg))?;
            Ok(())
        }

        fn handle_client_connected(&mut self, stream: &mut TcpStream) -> Result<()> {
            Self::send_message(0, Message::Hello, stream)?;

            let mut switch_id: Option<u64> = None;
            loop {
                let header = match read_header(stream) {
                    Ok(header) => header,
                    Err(e) => {
                        if let Some(sw) = switch_id {
                            self.switch_disconnected(sw);
                        }
                        return if e.kind() == io::ErrorKind::UnexpectedEof {
                            Ok(())
                        } else {
                            Err(e.into())
                        };
                    }
                };
                if header.length() < OfpHeader::size() {
                    return Err(Error::TruncatedMessage {
                        expected: OfpHeader::size(),
                        got: header.length(),
                    });
                }
                let mut body = vec![0u8; header.length() - OfpHeader::size()];
                stream.read_exact(&mut body)?;

                let (xid, msg) = match Message::parse(&header, &body) {
                    Ok(parsed) => parsed,
                    Err(Error::UnknownMessageCode(code)) => {
                        warn!("dropping message with unknown type code {}", code);
                        continue;
                    }
                    Err(Error::UnhandledMessage(code)) => {
                        debug!("ignoring {:?} message", code);
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                match msg {
                    Message::Hello => {
                        Self::send_message(xid, Message::FeaturesReq, stream)?
                    }
                    Message::EchoRequest(payload) => {
                        Self::send_message(xid, Message::EchoReply(payload), stream)?
                    }
                    Message::EchoReply(_) => (),
                    Message::FeaturesReply(feats) => {
                        let sw = feats.datapath_id;
                        switch_id = Some(sw);
                        info!("switch {:016x} connected", sw);
                        self.switch_connected(sw, feats, stream)?;
                    }
                    Message::PacketIn(pkt) => match switch_id {
                        Some(sw) => {
                            if let Err(e) = self.packet_in(sw, xid, pkt, stream) {
                                error!("packet-in handler failed: {}", e);
                            }
                        }
                        None => debug!("packet-in before features reply, dropping"),
                    },
                    Message::PortStatus(status) => match switch_id {
                        Some(sw) => self.port_status(sw, status),
                        None => debug!("port-status before features reply, dropping"),
                    },
                    // Controller-to-switch only; a switch never sends these.
                    Message::FeaturesReq | Message::FlowMod(_) => (),
                }
            }
        }
    }
}
