//! The parts of uplink and downlink messages the ADR engine reads and writes.

use heapless::Vec;

use super::types::{BandId, DataRate, MAX_FOPTS};
use super::Error;
use crate::encoding::maccommands::MacCommand;

/// MAC commands piggybacked on a downlink.
pub type FOpts = Vec<MacCommand, MAX_FOPTS>;

/// Reception of an uplink by one gateway.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GatewayMetadata {
    /// Signal to noise ratio in dB.
    pub snr: f32,
    /// Received signal strength in dBm.
    pub rssi: f32,
}

/// A deduplicated uplink.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UplinkMessage<'a> {
    /// ADR bit of FCtrl.
    pub adr: bool,
    /// ADRACKReq bit of FCtrl.
    pub adr_ack_req: bool,
    /// Frame counter.
    pub f_cnt: u32,
    /// Data rate the uplink was received at.
    pub data_rate: DataRate,
    /// Frequency plan of the receiving gateways.
    pub band: BandId,
    /// Every gateway that received the uplink.
    pub gateways: &'a [GatewayMetadata],
}

/// A downlink under construction, either the response template of an uplink or a scheduled
/// downlink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DownlinkMessage {
    /// ACK bit of FCtrl; setting it forces the downlink to be sent.
    pub ack: bool,
    /// Queued MAC commands, in transmission order.
    pub fopts: FOpts,
}

/// Builds a new command list from `fopts` where `link_adr_req` supersedes every queued
/// LinkADRReq. Other commands keep their order; the new command goes last.
pub fn replace_link_adr_req(
    fopts: &[MacCommand],
    link_adr_req: MacCommand,
) -> Result<FOpts, Error> {
    let mut rebuilt = FOpts::new();
    for cmd in fopts.iter().filter(|cmd| !cmd.is_link_adr_req()) {
        rebuilt.push(cmd.clone()).map_err(|_| Error::FOptsFull)?;
    }
    rebuilt.push(link_adr_req).map_err(|_| Error::FOptsFull)?;
    Ok(rebuilt)
}
