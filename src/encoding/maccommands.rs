// Copyright (c) 2018,2020 Ivaylo Petrov
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//
// author: Ivaylo Petrov <ivajloip@gmail.com>

use heapless::Vec;

use super::Error;
use crate::channel_mask::ChannelMask;

/// Largest MAC command payload that still fits in FOpts.
pub const MAX_MAC_PAYLOAD: usize = 15;

/// Command identifier of LinkADRReq.
pub const LINK_ADR_REQ_CID: u8 = 0x03;

/// A MAC command that can be written into FOpts.
pub trait SerializableMacCommand {
    /// Bytes of the command without the cid.
    fn payload_bytes(&self) -> &[u8];
    /// The cid of the command.
    fn cid(&self) -> u8;
    /// Length of the command without the cid.
    fn payload_len(&self) -> usize;
}

/// An already encoded MAC command queued in a downlink's FOpts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacCommand {
    cid: u8,
    payload: Vec<u8, MAX_MAC_PAYLOAD>,
}

impl MacCommand {
    /// Wraps a raw command identifier and payload.
    pub fn new(cid: u8, payload: &[u8]) -> Result<Self, Error> {
        let payload =
            Vec::from_slice(payload).map_err(|_| Error::MacCommandTooBigForFOpts)?;
        Ok(Self { cid, payload })
    }

    /// Snapshots the bytes of a command creator.
    pub fn from_serializable(cmd: &dyn SerializableMacCommand) -> Result<Self, Error> {
        Self::new(cmd.cid(), cmd.payload_bytes())
    }

    /// Is this a LinkADRReq?
    pub fn is_link_adr_req(&self) -> bool {
        self.cid == LINK_ADR_REQ_CID
    }
}

impl SerializableMacCommand for MacCommand {
    fn payload_bytes(&self) -> &[u8] {
        &self.payload
    }

    fn cid(&self) -> u8 {
        self.cid
    }

    fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

/// Redundancy byte of LinkADRReq: `ChMaskCntl` in bits 6..4, `NbTrans` in bits 3..0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Redundancy(u8);

impl Redundancy {
    /// Packs the channel mask control and the number of transmissions.
    pub fn new(channel_mask_control: u8, number_of_transmissions: u8) -> Result<Self, Error> {
        if channel_mask_control > 0x07 || number_of_transmissions > 0x0f {
            return Err(Error::RedundancyOutOfRange);
        }
        Ok(Self((channel_mask_control << 4) | number_of_transmissions))
    }

    /// Controls the interpretation of the previously defined ChMask bit mask.
    pub fn channel_mask_control(&self) -> u8 {
        (self.0 >> 4) & 0x07
    }

    /// How many times each uplink message should be repeated.
    pub fn number_of_transmissions(&self) -> u8 {
        self.0 & 0x0f
    }

    /// The raw byte.
    pub fn raw_value(&self) -> u8 {
        self.0
    }
}

impl From<u8> for Redundancy {
    fn from(v: u8) -> Self {
        Redundancy(v)
    }
}

/// Read-only view over the 4 payload bytes of a LinkADRReq.
#[derive(Debug, PartialEq, Eq)]
pub struct LinkADRReqPayload<'a>(&'a [u8]);

impl<'a> LinkADRReqPayload<'a> {
    /// Creates a new instance of the mac command if there is enought data.
    pub fn new(data: &'a [u8]) -> Result<LinkADRReqPayload<'a>, Error> {
        if data.len() != Self::len() {
            Err(Error::IncorrectSizeForMacCommand)
        } else {
            Ok(LinkADRReqPayload(data))
        }
    }

    /// Command identifier.
    pub const fn cid() -> u8 {
        LINK_ADR_REQ_CID
    }

    /// length of the payload of the mac command.
    pub const fn len() -> usize {
        4
    }

    /// Data rate index the device should switch to.
    pub fn data_rate(&self) -> u8 {
        self.0[0] >> 4
    }

    /// TX power index the device should switch to.
    pub fn tx_power(&self) -> u8 {
        self.0[0] & 0x0f
    }

    /// Uplink channels the device may use.
    pub fn channel_mask(&self) -> ChannelMask<2> {
        ChannelMask::new_from_raw(&self.0[1..3])
    }

    /// Channel mask control and number of transmissions.
    pub fn redundancy(&self) -> Redundancy {
        Redundancy::from(self.0[3])
    }
}
