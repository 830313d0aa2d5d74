//! Wire encoding of the MAC commands the network server queues on downlinks.

pub mod maccommandcreator;
pub mod maccommands;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Error {
    DataRateOutOfRange,
    TxPowerOutOfRange,
    RedundancyOutOfRange,
    TooManyChannels,
    BufferTooSmall,
    IncorrectSizeForMacCommand,
    MacCommandTooBigForFOpts,
}
