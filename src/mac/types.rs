//! Properties used in ADR processing.

use core::fmt;
use core::str::FromStr;

use lora_modulation::{Bandwidth, SpreadingFactor};

/// Number of uplink samples the ADR decision is based on.
pub const FRAMES_HISTORY_SIZE: usize = 20;
/// SNR margin, in dB, applied when a device has none configured.
pub const DEFAULT_ADR_MARGIN: u8 = 15;
/// Lowest number of transmissions proposed to a device.
pub const MIN_NB_TRANS: u8 = 1;
/// Highest number of transmissions proposed to a device.
pub const MAX_NB_TRANS: u8 = 3;
/// Upper bound on the MAC commands queued in one downlink.
pub const MAX_FOPTS: usize = 15;
/// Channels addressed by a LinkADRReq channel mask with `ChMaskCntl` 0.
pub const MAX_UPLINK_CHANNELS: usize = 16;

/// Frequency plan identifier, e.g. `EU_863_870`.
pub type BandId = heapless::String<16>;

/// Bounded history of uplink samples, newest first.
pub type FrameHistory = heapless::Vec<Frame, FRAMES_HISTORY_SIZE>;

/// One uplink as seen by the network server.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// Uplink frame counter.
    pub f_cnt: u32,
    /// Best SNR among the gateways that received the uplink.
    pub snr: f32,
    /// Number of gateways that received the uplink.
    pub gateway_count: u32,
}

/// Puts `frame` at the front of `history`, dropping the oldest sample when the window is full.
pub fn push_frame(history: &mut FrameHistory, frame: Frame) {
    *history = core::iter::once(frame)
        .chain(history.iter().copied())
        .take(FRAMES_HISTORY_SIZE)
        .collect();
}

/// Runtime knobs of the ADR engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdrConfig {
    /// Margin used for devices that have none configured.
    pub default_margin: u8,
}

impl Default for AdrConfig {
    fn default() -> Self {
        Self { default_margin: DEFAULT_ADR_MARGIN }
    }
}

/// A LoRa data rate, written `SF7BW125` on the wire between gateways and server.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataRate {
    /// Spreading factor.
    pub spreading_factor: SpreadingFactor,
    /// Channel bandwidth.
    pub bandwidth: Bandwidth,
}

impl DataRate {
    /// Creation.
    pub const fn new(spreading_factor: SpreadingFactor, bandwidth: Bandwidth) -> Self {
        Self { spreading_factor, bandwidth }
    }

    /// Numeric spreading factor, `None` outside of SF7..SF12.
    pub fn sf(&self) -> Option<u8> {
        match self.spreading_factor {
            SpreadingFactor::_7 => Some(7),
            SpreadingFactor::_8 => Some(8),
            SpreadingFactor::_9 => Some(9),
            SpreadingFactor::_10 => Some(10),
            SpreadingFactor::_11 => Some(11),
            SpreadingFactor::_12 => Some(12),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// Bandwidth in kHz, `None` for bandwidths LoRaWAN does not use.
    pub fn bw_khz(&self) -> Option<u16> {
        match self.bandwidth {
            Bandwidth::_125KHz => Some(125),
            Bandwidth::_250KHz => Some(250),
            Bandwidth::_500KHz => Some(500),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}

/// Error returned when a data rate string is not of the `SFxxBWyyy` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseDataRateError;

impl FromStr for DataRate {
    type Err = ParseDataRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("SF").ok_or(ParseDataRateError)?;
        let (sf, bw) = rest.split_once("BW").ok_or(ParseDataRateError)?;
        let spreading_factor = match sf.parse::<u8>().map_err(|_| ParseDataRateError)? {
            7 => SpreadingFactor::_7,
            8 => SpreadingFactor::_8,
            9 => SpreadingFactor::_9,
            10 => SpreadingFactor::_10,
            11 => SpreadingFactor::_11,
            12 => SpreadingFactor::_12,
            _ => return Err(ParseDataRateError),
        };
        let bandwidth = match bw.parse::<u16>().map_err(|_| ParseDataRateError)? {
            125 => Bandwidth::_125KHz,
            250 => Bandwidth::_250KHz,
            500 => Bandwidth::_500KHz,
            _ => return Err(ParseDataRateError),
        };
        Ok(Self { spreading_factor, bandwidth })
    }
}

impl fmt::Display for DataRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.sf(), self.bw_khz()) {
            (Some(sf), Some(bw)) => write!(f, "SF{}BW{}", sf, bw),
            _ => write!(f, "{:?}/{:?}", self.spreading_factor, self.bandwidth),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DataRate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DataRate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DataRateVisitor;

        impl serde::de::Visitor<'_> for DataRateVisitor {
            type Value = DataRate;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a data rate such as SF7BW125")
            }

            fn visit_str<E>(self, value: &str) -> Result<DataRate, E>
            where
                E: serde::de::Error,
            {
                value
                    .parse()
                    .map_err(|_| E::invalid_value(serde::de::Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_str(DataRateVisitor)
    }
}
