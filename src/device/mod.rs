//! Device record owned by the network server and the storage it relies on.

pub mod frames_store;

use crate::mac::types::{BandId, DataRate};

/// Identity of a device, as registered with the network server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceId {
    /// Application identifier.
    pub app_eui: [u8; 8],
    /// Device identifier.
    pub dev_eui: [u8; 8],
}

impl DeviceId {
    /// Creation.
    pub const fn new(app_eui: [u8; 8], dev_eui: [u8; 8]) -> Self {
        Self { app_eui, dev_eui }
    }
}

/// ADR bookkeeping of a device.
///
/// `None` means the value was never observed or assigned; zero is a legitimate value for every
/// numeric field.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdrState {
    /// Frequency plan, fixed by the first ADR uplink.
    pub band: Option<BandId>,
    /// Data rate of the latest ADR uplink, or the one last commanded.
    pub data_rate: Option<DataRate>,
    /// TX power in dBm.
    pub tx_power: Option<u8>,
    /// Number of transmissions of each uplink.
    pub nb_trans: Option<u8>,
    /// SNR margin in dB.
    pub margin: Option<u8>,
    /// A LinkADRReq should be computed on the next downlink.
    pub send_req: bool,
    /// Consecutive LinkADRReq the device rejected.
    pub failed: u32,
}

/// Per-device switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Options {
    /// Frame counters are not trusted, so losses cannot be measured.
    pub disable_fcnt_check: bool,
}

/// A device as held by the network server.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Device {
    #[allow(missing_docs)]
    pub id: DeviceId,
    #[allow(missing_docs)]
    pub adr: AdrState,
    #[allow(missing_docs)]
    pub options: Options,
}

impl Device {
    /// A device with no ADR history.
    pub fn new(id: DeviceId) -> Self {
        Self { id, adr: AdrState::default(), options: Options::default() }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_unset_and_zero_persist_differently() {
        let mut device = Device::new(DeviceId::new([1; 8], [2; 8]));
        device.adr.tx_power = Some(0);
        device.adr.data_rate = Some("SF10BW125".parse().unwrap());
        let json = serde_json::to_value(&device).unwrap();

        assert_eq!(json["adr"]["tx_power"], serde_json::json!(0));
        assert_eq!(json["adr"]["margin"], serde_json::Value::Null);
        assert_eq!(json["adr"]["data_rate"], serde_json::json!("SF10BW125"));

        let decoded: Device = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, device);
    }
}
