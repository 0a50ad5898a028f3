// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Types shared by users of the STM32H7R/S EXTI driver.
//!
//! Nothing in here touches hardware; see `drv-stm32h7rs-exti` for that.

#![cfg_attr(target_os = "none", no_std)]

use bitflags::bitflags;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

pub mod line;

pub use line::{Line, LineKind, LINE_COUNT};

#[derive(Copy, Clone, Debug, FromPrimitive, Eq, PartialEq)]
#[repr(u32)]
pub enum ExtiError {
    /// The handle has not been bound to a line yet.
    Unbound = 1,
    /// The callback identifier is not one this device dispatches.
    UnsupportedCallback,
}

bitflags! {
    /// Which outputs a line drives when it fires.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct Mode: u32 {
        const INTERRUPT = 0b01;
        const EVENT     = 0b10;
        const INTERRUPT_AND_EVENT = Self::INTERRUPT.bits() | Self::EVENT.bits();
    }
}

impl Mode {
    pub const NONE: Self = Self::empty();
}

bitflags! {
    /// Signal edges that set a configurable line's pending bit.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct Trigger: u32 {
        const RISING  = 0b01;
        const FALLING = 0b10;
        const RISING_AND_FALLING = Self::RISING.bits() | Self::FALLING.bits();
    }
}

impl Trigger {
    pub const NONE: Self = Self::empty();
}

/// GPIO ports as encoded in the SBS `EXTICRx` multiplexer fields. There is a
/// hole between H and M; ports I through L don't exist on this family.
#[derive(Copy, Clone, Debug, Eq, PartialEq, FromPrimitive)]
#[repr(u8)]
pub enum Port {
    A = 0,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    M = 12,
    N,
    O,
    P,
}

impl Port {
    /// Value written into the multiplexer field.
    #[inline(always)]
    pub const fn selector(self) -> u32 {
        self as u32
    }

    /// Decodes a multiplexer field, returning `None` for the encodings that
    /// name no port.
    pub fn from_selector(sel: u32) -> Option<Self> {
        Self::from_u32(sel)
    }
}

/// Callback slots a handle can be asked to fill.
///
/// Parts with separate rising and falling pending registers dispatch the
/// edges to different callbacks. This one has a single pending bit per line,
/// so only `Common` is accepted; the others exist so that code written for
/// those parts fails cleanly instead of silently never being called.
#[derive(Copy, Clone, Debug, Eq, PartialEq, FromPrimitive)]
#[repr(u32)]
pub enum CallbackId {
    Common = 0,
    Rising,
    Falling,
}

/// Complete configuration of one line, as set or reported in one go.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ExtiConfig {
    pub line: Line,
    pub mode: Mode,
    /// Ignored for direct lines, and reported as `Trigger::NONE` for them.
    pub trigger: Trigger,
    /// Ignored for lines that aren't GPIO lines, and reported as `Port::A`
    /// (selector zero) for them.
    ///
    /// When read back, a multiplexer field holding one of the unused
    /// encodings (8-11) fails a debug assertion and is otherwise reported
    /// as `Port::A`; the raw value is lost.
    pub port: Port,
}

impl ExtiConfig {
    /// A configuration for `line` with everything off.
    pub const fn new(line: Line) -> Self {
        Self {
            line,
            mode: Mode::NONE,
            trigger: Trigger::NONE,
            port: Port::A,
        }
    }
}
