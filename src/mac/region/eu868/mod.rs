//! Plan for the EU 863-870 MHz band, with the default uplink channel set.

use lora_modulation::{Bandwidth, SpreadingFactor};

use super::{AdrLimits, TablePlan, UplinkChannel};
use crate::mac::types::DataRate;

const DR_0_TO_5: &[u8] = &[0, 1, 2, 3, 4, 5];
const DR_0_TO_6: &[u8] = &[0, 1, 2, 3, 4, 5, 6];

const DATA_RATES: [Option<DataRate>; 7] = [
    Some(DataRate::new(SpreadingFactor::_12, Bandwidth::_125KHz)),
    Some(DataRate::new(SpreadingFactor::_11, Bandwidth::_125KHz)),
    Some(DataRate::new(SpreadingFactor::_10, Bandwidth::_125KHz)),
    Some(DataRate::new(SpreadingFactor::_9, Bandwidth::_125KHz)),
    Some(DataRate::new(SpreadingFactor::_8, Bandwidth::_125KHz)),
    Some(DataRate::new(SpreadingFactor::_7, Bandwidth::_125KHz)),
    Some(DataRate::new(SpreadingFactor::_7, Bandwidth::_250KHz)),
];

const UPLINK_CHANNELS: [UplinkChannel; 8] = [
    UplinkChannel::new(868_100_000, DR_0_TO_5),
    UplinkChannel::new(868_300_000, DR_0_TO_6),
    UplinkChannel::new(868_500_000, DR_0_TO_5),
    UplinkChannel::new(867_100_000, DR_0_TO_5),
    UplinkChannel::new(867_300_000, DR_0_TO_5),
    UplinkChannel::new(867_500_000, DR_0_TO_5),
    UplinkChannel::new(867_700_000, DR_0_TO_5),
    UplinkChannel::new(867_900_000, DR_0_TO_5),
];

/// EU 863-870 MHz.
pub const EU_863_870: TablePlan = TablePlan {
    name: "EU_863_870",
    data_rates: &DATA_RATES,
    tx_powers: &[20, 14, 11, 8, 5, 2],
    default_tx_power: 14,
    uplink_channels: &UPLINK_CHANNELS,
    adr: Some(AdrLimits {
        min_data_rate: 0,
        max_data_rate: 5,
        min_tx_power: 2,
        max_tx_power: 14,
        tx_power_step: 3,
    }),
};
