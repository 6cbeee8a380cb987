use std::net::{SocketAddr, TcpListener};

use clap::Parser;
use log::{error, info};

use flowpin::ofp_controller::OfpController;
use flowpin::pinhole::{PinholeSwitch, SwitchConfig};

/// OpenFlow 1.0 controller installing per-flow pinhole rules toward a fixed
/// host port.
#[derive(Parser)]
struct Args {
    /// Address to accept switch connections on.
    #[arg(long, default_value = "127.0.0.1:6633")]
    listen: SocketAddr,

    /// Switch port the host hangs off of.
    #[arg(long, default_value_t = 2)]
    host_port: u16,

    /// Egress port for traffic arriving from the host.
    #[arg(long, default_value_t = 1)]
    out_port: u16,
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = SwitchConfig {
        host_port: args.host_port,
        out_port: args.out_port,
    };

    let listener = TcpListener::bind(args.listen)?;
    info!("listening for switches on {}", args.listen);
    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                std::thread::spawn(move || {
                    let peer = stream.peer_addr();
                    let mut app = PinholeSwitch::new(config);
                    if let Err(e) = app.handle_client_connected(&mut stream) {
                        error!("connection {:?} failed: {}", peer, e);
                    }
                });
            }
            Err(e) => error!("accept failed: {}", e),
        }
    }
    Ok(())
}
