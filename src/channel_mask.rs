//! Channel mask carried by LinkADRReq.

use crate::encoding::Error;

/// Bit-per-channel mask, little-endian on the wire (bit 0 of byte 0 is channel 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelMask<const N: usize>([u8; N]);

impl<const N: usize> ChannelMask<N> {
    /// Number of channels the mask can address.
    pub const CHANNELS: usize = N * 8;

    /// Constructs a new ChannelMask from the provided data.
    pub fn new(data: &[u8]) -> Result<Self, Error> {
        if data.len() < N {
            return Err(Error::BufferTooSmall);
        }
        Ok(Self::new_from_raw(data))
    }

    /// Constructs a new ChannelMask from the provided data, without verifying if they are
    /// admissible.
    ///
    /// Improper use of this method could lead to panic during runtime!
    pub fn new_from_raw(data: &[u8]) -> Self {
        let mut payload = [0; N];
        payload.copy_from_slice(&data[..N]);
        ChannelMask(payload)
    }

    /// Builds a mask from per-channel flags, `statuses[i]` enabling channel `i`.
    pub fn from_statuses(statuses: &[bool]) -> Result<Self, Error> {
        if statuses.len() > Self::CHANNELS {
            return Err(Error::TooManyChannels);
        }
        let mut mask = Self::default();
        for (index, _) in statuses.iter().enumerate().filter(|(_, enabled)| **enabled) {
            mask.set_channel(index, true);
        }
        Ok(mask)
    }

    fn channel_enabled(&self, index: usize) -> bool {
        self.0[index >> 3] & (1 << (index & 0x07)) != 0
    }

    fn set_channel(&mut self, index: usize, enabled: bool) {
        if enabled {
            self.0[index >> 3] |= 1 << (index & 0x07);
        } else {
            self.0[index >> 3] &= !(1 << (index & 0x07));
        }
    }

    /// Verifies if a given channel is enabled.
    pub fn is_enabled(&self, index: usize) -> Result<bool, Error> {
        if index >= Self::CHANNELS {
            return Err(Error::TooManyChannels);
        }
        Ok(self.channel_enabled(index))
    }

    /// Provides information for each of the channels if they are enabled.
    pub fn statuses<const C: usize>(&self) -> [bool; C] {
        let mut res = [false; C];
        for (i, c) in res.iter_mut().enumerate().take(Self::CHANNELS) {
            *c = self.channel_enabled(i);
        }
        res
    }
}

impl<const N: usize> Default for ChannelMask<N> {
    fn default() -> Self {
        ChannelMask([0; N])
    }
}

impl<const N: usize> From<[u8; N]> for ChannelMask<N> {
    fn from(v: [u8; N]) -> Self {
        ChannelMask(v)
    }
}

impl<const N: usize> AsRef<[u8]> for ChannelMask<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}
