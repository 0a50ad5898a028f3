// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! EXTI line identifiers.
//!
//! A line identifier packs everything the driver needs to know about a line
//! into one `u32`:
//!
//! ```text
//!  31   28 27      24 23   18 17  16 15      5 4     0
//! +-------+----------+-------+------+---------+-------+
//! | 000 E |   kind   | 00000 | bank | 0000000 |  pin  |
//! +-------+----------+-------+------+---------+-------+
//! ```
//!
//! - `pin` is the bit position inside the bank's registers.
//! - `bank` picks which copy of each register (IMRx, RTSRx, PRx, ...) holds
//!   the line.
//! - `kind` says whether the line is direct (mask bits only), configurable
//!   (trigger and pending registers exist) or wired to a GPIO pin
//!   (configurable, plus an SBS multiplexer field). Bit 27 marks reserved
//!   lines, which are never valid.
//! - `E` is set if the line can generate events as well as interrupts.
//!
//! Identifiers are fixed by the device; the constants at the bottom of this
//! file are the full table for the H7R/S parts.

/// Total number of EXTI lines on this device.
pub const LINE_COUNT: u32 = 87;

/// What the hardware implements for a line.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineKind {
    /// Interrupt and event mask bits only. The line is driven directly by a
    /// peripheral and its state is cleared in that peripheral.
    Direct,
    /// Mask bits, rising/falling trigger selection, software trigger and a
    /// pending bit.
    Configurable,
    /// Like `Configurable`, and the source is picked from the GPIO ports by
    /// the SBS multiplexer.
    Gpio,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Line(u32);

impl Line {
    const PIN_MASK: u32 = 0x0000_001f;
    const BANK_SHIFT: u32 = 16;
    const BANK_MASK: u32 = 0x3 << Self::BANK_SHIFT;

    const KIND_SHIFT: u32 = 24;
    const DIRECT: u32 = 0x01 << Self::KIND_SHIFT;
    const CONFIG: u32 = 0x02 << Self::KIND_SHIFT;
    const GPIO: u32 = (0x04 << Self::KIND_SHIFT) | Self::CONFIG;
    const RESERVED: u32 = 0x08 << Self::KIND_SHIFT;
    const KIND_MASK: u32 =
        Self::DIRECT | Self::CONFIG | Self::GPIO | Self::RESERVED;

    const EVENT: u32 = 0x01 << 28;

    /// Encodes line number `number` (0-based, across all banks).
    pub const fn new(kind: LineKind, event: bool, number: u32) -> Self {
        let kind = match kind {
            LineKind::Direct => Self::DIRECT,
            LineKind::Configurable => Self::CONFIG,
            LineKind::Gpio => Self::GPIO,
        };
        let event = if event { Self::EVENT } else { 0 };
        Self(
            kind | event
                | ((number / 32) << Self::BANK_SHIFT)
                | (number % 32),
        )
    }

    /// Wraps an identifier encoded elsewhere. No checking happens here; see
    /// [`Line::is_valid`].
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index of the register bank holding this line.
    #[inline(always)]
    pub const fn bank(self) -> usize {
        ((self.0 & Self::BANK_MASK) >> Self::BANK_SHIFT) as usize
    }

    /// Bit position of this line inside its bank.
    #[inline(always)]
    pub const fn pin(self) -> u32 {
        self.0 & Self::PIN_MASK
    }

    /// Single-bit mask selecting this line inside its bank's registers.
    #[inline(always)]
    pub const fn mask(self) -> u32 {
        1 << self.pin()
    }

    /// Line number as printed in the reference manual.
    pub const fn number(self) -> u32 {
        self.bank() as u32 * 32 + self.pin()
    }

    pub const fn kind(self) -> Option<LineKind> {
        match self.0 & Self::KIND_MASK {
            Self::DIRECT => Some(LineKind::Direct),
            Self::CONFIG => Some(LineKind::Configurable),
            Self::GPIO => Some(LineKind::Gpio),
            _ => None,
        }
    }

    /// Whether the line has trigger, software-trigger and pending registers.
    #[inline(always)]
    pub const fn is_configurable(self) -> bool {
        self.0 & Self::CONFIG != 0
    }

    /// Whether the line's source is chosen through the port multiplexer.
    #[inline(always)]
    pub const fn is_gpio(self) -> bool {
        self.0 & Self::GPIO == Self::GPIO
    }

    #[inline(always)]
    pub const fn supports_event(self) -> bool {
        self.0 & Self::EVENT != 0
    }

    /// Checks that this identifier describes a line that exists on this
    /// device: no stray bits, exactly one kind, in range, and GPIO lines on
    /// pins 0 through 15.
    pub const fn is_valid(self) -> bool {
        let fields =
            Self::KIND_MASK | Self::EVENT | Self::BANK_MASK | Self::PIN_MASK;
        if self.0 & !fields != 0 {
            return false;
        }
        let Some(kind) = self.kind() else {
            return false;
        };
        if self.number() >= LINE_COUNT {
            return false;
        }
        match kind {
            LineKind::Gpio => self.pin() < 16,
            _ => true,
        }
    }
}

macro_rules! device_lines {
    ($($name:ident = $number:literal, $kind:ident, $event:literal;)*) => {
        $(
            pub const $name: Line = Line::new(LineKind::$kind, $event, $number);
        )*

        impl Line {
            /// Every line on the device, in line-number order.
            pub const ALL: &'static [Line] = &[$($name),*];
        }
    };
}

device_lines! {
    LINE_0 = 0, Gpio, true;
    LINE_1 = 1, Gpio, true;
    LINE_2 = 2, Gpio, true;
    LINE_3 = 3, Gpio, true;
    LINE_4 = 4, Gpio, true;
    LINE_5 = 5, Gpio, true;
    LINE_6 = 6, Gpio, true;
    LINE_7 = 7, Gpio, true;
    LINE_8 = 8, Gpio, true;
    LINE_9 = 9, Gpio, true;
    LINE_10 = 10, Gpio, true;
    LINE_11 = 11, Gpio, true;
    LINE_12 = 12, Gpio, true;
    LINE_13 = 13, Gpio, true;
    LINE_14 = 14, Gpio, true;
    LINE_15 = 15, Gpio, true;
    LINE_16 = 16, Configurable, true;
    LINE_17 = 17, Configurable, true;
    LINE_18 = 18, Configurable, true;
    LINE_19 = 19, Configurable, true;
    LINE_20 = 20, Configurable, true;
    LINE_21 = 21, Configurable, true;
    LINE_22 = 22, Direct, true;
    LINE_23 = 23, Direct, true;
    LINE_24 = 24, Direct, true;
    LINE_25 = 25, Direct, true;
    LINE_26 = 26, Direct, true;
    LINE_27 = 27, Direct, true;
    LINE_28 = 28, Direct, true;
    LINE_29 = 29, Direct, true;
    LINE_30 = 30, Direct, true;
    LINE_31 = 31, Direct, true;
    LINE_32 = 32, Direct, true;
    LINE_33 = 33, Direct, true;
    LINE_34 = 34, Direct, true;
    LINE_35 = 35, Direct, true;
    LINE_36 = 36, Direct, true;
    LINE_37 = 37, Direct, true;
    LINE_38 = 38, Direct, true;
    LINE_39 = 39, Direct, true;
    LINE_40 = 40, Direct, true;
    LINE_41 = 41, Direct, true;
    LINE_42 = 42, Direct, true;
    LINE_43 = 43, Direct, true;
    LINE_44 = 44, Direct, true;
    LINE_45 = 45, Direct, true;
    LINE_46 = 46, Direct, true;
    LINE_47 = 47, Direct, true;
    LINE_48 = 48, Configurable, true;
    LINE_49 = 49, Configurable, true;
    LINE_50 = 50, Configurable, true;
    LINE_51 = 51, Configurable, true;
    LINE_52 = 52, Configurable, true;
    LINE_53 = 53, Configurable, true;
    LINE_54 = 54, Direct, false;
    LINE_55 = 55, Direct, false;
    LINE_56 = 56, Direct, false;
    LINE_57 = 57, Direct, false;
    LINE_58 = 58, Direct, false;
    LINE_59 = 59, Direct, false;
    LINE_60 = 60, Direct, false;
    LINE_61 = 61, Direct, false;
    LINE_62 = 62, Direct, false;
    LINE_63 = 63, Direct, false;
    LINE_64 = 64, Configurable, true;
    LINE_65 = 65, Configurable, true;
    LINE_66 = 66, Configurable, true;
    LINE_67 = 67, Direct, false;
    LINE_68 = 68, Direct, false;
    LINE_69 = 69, Direct, false;
    LINE_70 = 70, Direct, false;
    LINE_71 = 71, Direct, false;
    LINE_72 = 72, Direct, false;
    LINE_73 = 73, Direct, false;
    LINE_74 = 74, Direct, false;
    LINE_75 = 75, Direct, false;
    LINE_76 = 76, Direct, false;
    LINE_77 = 77, Direct, false;
    LINE_78 = 78, Direct, false;
    LINE_79 = 79, Direct, false;
    LINE_80 = 80, Direct, false;
    LINE_81 = 81, Direct, false;
    LINE_82 = 82, Direct, false;
    LINE_83 = 83, Direct, false;
    LINE_84 = 84, Direct, false;
    LINE_85 = 85, Direct, false;
    LINE_86 = 86, Direct, false;
}
