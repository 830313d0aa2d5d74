#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

use core::fmt::Debug;

// must stay first so the logging macros are visible to the other modules
mod fmt;

pub mod channel_mask;
pub mod device;
pub mod encoding;
pub mod mac;

pub use mac::adr::{handle_downlink_adr, handle_uplink_adr};
pub use mac::region;

/// Errors surfaced by the ADR engine, generic over the frames store error.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Error<E>
where
    E: Debug,
{
    Store(E),
    Region(region::Error),
    Mac(mac::Error),
    Encoding(encoding::Error),
}

impl<E> From<encoding::Error> for Error<E>
where
    E: Debug,
{
    fn from(value: encoding::Error) -> Self {
        Self::Encoding(value)
    }
}
