//! Storage of the recent uplink history of each device, implemented by calling code.

use core::fmt::Debug;

use heapless::FnvIndexMap;

use super::DeviceId;
use crate::mac::types::{push_frame, Frame, FrameHistory};

/// Per-device window of the most recent ADR uplinks.
pub trait FramesStore {
    #[cfg(feature = "defmt")]
    #[allow(missing_docs)]
    type Error: Debug + defmt::Format;

    #[cfg(not(feature = "defmt"))]
    #[allow(missing_docs)]
    type Error: Debug;

    /// Record `frame` as the newest sample of `id`, evicting the oldest beyond the window.
    fn push(&mut self, id: &DeviceId, frame: Frame) -> Result<(), Self::Error>;

    /// Snapshot of the samples of `id`, newest first. Empty for unknown devices.
    fn get(&self, id: &DeviceId) -> Result<FrameHistory, Self::Error>;

    /// Drop every sample of `id`.
    fn clear(&mut self, id: &DeviceId) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Error {
    /// No room left for another device.
    StoreFull,
}

/// In-memory store for up to `DEVICES` devices, which must be a power of two.
#[derive(Debug, Default)]
pub struct MemoryFramesStore<const DEVICES: usize> {
    histories: FnvIndexMap<DeviceId, FrameHistory, DEVICES>,
}

impl<const DEVICES: usize> MemoryFramesStore<DEVICES> {
    /// Creation.
    pub fn new() -> Self {
        Self { histories: FnvIndexMap::new() }
    }

    /// Number of devices with a history.
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    /// Is there no history at all?
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}

impl<const DEVICES: usize> FramesStore for MemoryFramesStore<DEVICES> {
    type Error = Error;

    fn push(&mut self, id: &DeviceId, frame: Frame) -> Result<(), Error> {
        if let Some(history) = self.histories.get_mut(id) {
            push_frame(history, frame);
            return Ok(());
        }
        let mut history = FrameHistory::new();
        push_frame(&mut history, frame);
        self.histories.insert(*id, history).map_err(|_| Error::StoreFull)?;
        Ok(())
    }

    fn get(&self, id: &DeviceId) -> Result<FrameHistory, Error> {
        Ok(self.histories.get(id).cloned().unwrap_or_default())
    }

    fn clear(&mut self, id: &DeviceId) -> Result<(), Error> {
        self.histories.remove(id);
        Ok(())
    }
}
