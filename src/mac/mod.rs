//! Network-server side MAC processing: ADR decisions and the downlink MAC commands carrying them.

pub mod adr;
pub mod message;
pub mod region;
pub mod types;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Error {
    /// The downlink cannot carry one more MAC command.
    FOptsFull,
}
impl<E> From<Error> for crate::Error<E>
where
    E: core::fmt::Debug,
{
    fn from(value: Error) -> Self {
        Self::Mac(value)
    }
}
