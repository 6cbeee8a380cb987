#![crate_name = "flowpin"]
#![crate_type = "lib"]

mod bits;
pub mod error;
pub mod ofp_controller;
pub mod ofp_header;
pub mod ofp_message;
pub mod openflow0x01;
pub mod packet;
pub mod pathcheck;
pub mod pinhole;

pub use error::Error;
