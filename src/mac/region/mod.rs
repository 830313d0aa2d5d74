//! Frequency plan capability consumed by the ADR engine, and a table-driven implementation of it.
//!
//! Each region is plain data ([`TablePlan`]) resolved by its band identifier through [`Bands`].

use super::types::DataRate;

pub mod eu868;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Error {
    /// The plan cannot compute an ADR adjustment for the given input.
    AdrUnavailable,
    UnknownBand,
    DataRateNotFound,
    TxPowerNotFound,
}
impl<E> From<Error> for crate::Error<E>
where
    E: core::fmt::Debug,
{
    fn from(value: Error) -> Self {
        Self::Region(value)
    }
}

/// An uplink channel and the data rate indices a device may use on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UplinkChannel {
    /// Center frequency in Hz.
    pub frequency: u32,
    /// Allowed data rate indices.
    pub data_rates: &'static [u8],
}

impl UplinkChannel {
    /// Creation.
    pub const fn new(frequency: u32, data_rates: &'static [u8]) -> Self {
        Self { frequency, data_rates }
    }

    /// Does this channel accept uplinks at data rate index `dr`?
    pub fn allows(&self, dr: u8) -> bool {
        self.data_rates.contains(&dr)
    }
}

/// Regional characteristics needed to compute a LinkADRReq.
pub trait FrequencyPlan {
    /// Band identifier, e.g. `EU_863_870`.
    fn name(&self) -> &str;
    /// TX power in dBm assumed for devices that never received a power setting.
    fn default_tx_power(&self) -> u8;
    /// Desired data rate and TX power given the current ones, the best SNR over the
    /// history window and the device margin.
    ///
    /// Returns [`Error::AdrUnavailable`] when the plan cannot propose anything.
    fn adr_settings(
        &self,
        data_rate: &DataRate,
        tx_power: u8,
        max_snr: f32,
        margin: f32,
    ) -> Result<(DataRate, u8), Error>;
    /// Wire index of a data rate.
    fn data_rate_index(&self, data_rate: &DataRate) -> Result<u8, Error>;
    /// Data rate behind a wire index.
    fn data_rate(&self, index: u8) -> Result<DataRate, Error>;
    /// Wire index of a TX power in dBm.
    fn tx_power_index(&self, tx_power: u8) -> Result<u8, Error>;
    /// TX power in dBm behind a wire index.
    fn tx_power(&self, index: u8) -> Result<u8, Error>;
    /// Uplink channels, in channel mask order.
    fn uplink_channels(&self) -> &[UplinkChannel];
}

/// Resolution of a frequency plan by band identifier.
pub trait Bands {
    /// Get the plan registered under `band`.
    fn get(&self, band: &str) -> Result<&dyn FrequencyPlan, Error>;
}

/// A fixed set of plans.
pub struct StaticBands<'a>(pub &'a [&'a dyn FrequencyPlan]);

impl Bands for StaticBands<'_> {
    fn get(&self, band: &str) -> Result<&dyn FrequencyPlan, Error> {
        self.0.iter().copied().find(|plan| plan.name() == band).ok_or(Error::UnknownBand)
    }
}

/// Bounds the ADR policy of a [`TablePlan`] moves within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdrLimits {
    /// Slowest data rate index ADR will propose.
    pub min_data_rate: u8,
    /// Fastest data rate index ADR will propose.
    pub max_data_rate: u8,
    /// Lowest TX power in dBm.
    pub min_tx_power: u8,
    /// Highest TX power in dBm.
    pub max_tx_power: u8,
    /// dB per step, also the SNR margin consumed by one step.
    pub tx_power_step: u8,
}

/// Table-driven frequency plan.
#[derive(Debug)]
pub struct TablePlan {
    /// Band identifier.
    pub name: &'static str,
    /// Data rates by index; `None` for indices that are not LoRa (FSK) or RFU.
    pub data_rates: &'static [Option<DataRate>],
    /// TX powers in dBm by index.
    pub tx_powers: &'static [u8],
    /// TX power in dBm used when none is known.
    pub default_tx_power: u8,
    /// Uplink channels.
    pub uplink_channels: &'static [UplinkChannel],
    /// ADR bounds, `None` when the region does not support ADR.
    pub adr: Option<AdrLimits>,
}

/// Lowest SNR, in dB, a LoRa demodulator still decodes at the given data rate.
///
/// SNR is measured within the channel bandwidth, so the floor only depends on the spreading
/// factor: SF7BW250 shares the floor of SF7BW125.
pub fn demodulation_floor(data_rate: &DataRate) -> Option<f32> {
    match data_rate.sf()? {
        7 => Some(-7.5),
        8 => Some(-10.0),
        9 => Some(-12.5),
        10 => Some(-15.0),
        11 => Some(-17.5),
        12 => Some(-20.0),
        _ => None,
    }
}

// whole steps of `step` dB in `margin`, rounded toward zero
fn steps(margin: f32, step: f32) -> i32 {
    (margin / step) as i32
}

impl FrequencyPlan for TablePlan {
    fn name(&self) -> &str {
        self.name
    }

    fn default_tx_power(&self) -> u8 {
        self.default_tx_power
    }

    fn adr_settings(
        &self,
        data_rate: &DataRate,
        tx_power: u8,
        max_snr: f32,
        margin: f32,
    ) -> Result<(DataRate, u8), Error> {
        let limits = self.adr.ok_or(Error::AdrUnavailable)?;
        let floor = demodulation_floor(data_rate).ok_or(Error::AdrUnavailable)?;
        let mut n_step = steps(max_snr - floor - margin, limits.tx_power_step as f32);

        let mut dr = self.data_rate_index(data_rate)?.max(limits.min_data_rate);
        while n_step > 0 && dr < limits.max_data_rate {
            dr += 1;
            n_step -= 1;
        }

        let mut power = tx_power;
        while n_step > 0 && power > limits.min_tx_power {
            power = power.saturating_sub(limits.tx_power_step).max(limits.min_tx_power);
            n_step -= 1;
        }
        while n_step < 0 && power < limits.max_tx_power {
            power = power.saturating_add(limits.tx_power_step).min(limits.max_tx_power);
            n_step += 1;
        }

        Ok((self.data_rate(dr)?, power))
    }

    fn data_rate_index(&self, data_rate: &DataRate) -> Result<u8, Error> {
        self.data_rates
            .iter()
            .position(|dr| dr.as_ref() == Some(data_rate))
            .map(|index| index as u8)
            .ok_or(Error::DataRateNotFound)
    }

    fn data_rate(&self, index: u8) -> Result<DataRate, Error> {
        self.data_rates.get(index as usize).cloned().flatten().ok_or(Error::DataRateNotFound)
    }

    fn tx_power_index(&self, tx_power: u8) -> Result<u8, Error> {
        self.tx_powers
            .iter()
            .position(|power| *power == tx_power)
            .map(|index| index as u8)
            .ok_or(Error::TxPowerNotFound)
    }

    fn tx_power(&self, index: u8) -> Result<u8, Error> {
        self.tx_powers.get(index as usize).copied().ok_or(Error::TxPowerNotFound)
    }

    fn uplink_channels(&self) -> &[UplinkChannel] {
        self.uplink_channels
    }
}
