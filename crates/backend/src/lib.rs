//! Backend crate: kernel tiers and dispatch for heavyload.
//!
//! - **Dispatch**: ordered candidate lists, first-match selection, and a
//!   cached [`Dispatcher`](dispatch::Dispatcher)
//! - **Tiers**: the vector width a kernel operates on
//! - **Capabilities**: re-exported from `platform`
//!
//! Kernel crates register candidates best-first and always end the list with a
//! portable entry that requires nothing, so selection cannot come up empty.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod dispatch;
pub mod tier;

pub use dispatch::{Candidate, Dispatcher, Selected, select, select_or};
pub use platform;
pub use tier::KernelTier;
