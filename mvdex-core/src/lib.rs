#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod checkpoint;
pub mod config;
pub mod contracts;
pub mod events;
pub mod processors;
pub mod view;

#[cfg(test)]
mod testing;
