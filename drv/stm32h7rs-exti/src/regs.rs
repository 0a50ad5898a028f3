// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Register-level view of the EXTI and the SBS port multiplexer.
//!
//! The driver never touches memory directly. It names a register with
//! [`Register`] and goes through [`ExtiRegisters`], which the real hardware
//! implements with [`Mmio`]. Keeping this seam narrow means the bank and bit
//! arithmetic in the driver can be exercised against a model of the
//! peripheral on the host.

use static_assertions::const_assert_eq;
use vcell::VolatileCell;

/// Base address of the EXTI register block.
pub const EXTI_BASE: usize = 0x5800_0000;

/// Address of `SBS_EXTICR1`; `EXTICR2..4` follow it.
pub const SBS_EXTICR_BASE: usize = 0x5800_0410;

/// Number of 32-line register banks.
pub const BANK_COUNT: usize = 3;

/// Number of `EXTICRx` registers. Each holds four multiplexer fields.
pub const EXTICR_COUNT: usize = 4;

/// Width of one multiplexer field in `EXTICRx`.
pub const EXTICR_FIELD_BITS: u32 = 4;

/// Mask of one multiplexer field, before shifting into place.
pub const EXTICR_FIELD_MASK: u32 = (1 << EXTICR_FIELD_BITS) - 1;

/// A single 32-bit register the driver may access. Banked registers carry
/// their bank index, `PortSelect` carries the `EXTICRx` index (0-based).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Register {
    /// `RTSRx`
    RisingTrigger(usize),
    /// `FTSRx`
    FallingTrigger(usize),
    /// `SWIERx`. Writing a 1 sets the matching pending bit; 0s are ignored.
    SoftwareTrigger(usize),
    /// `CPUIMRx`
    InterruptMask(usize),
    /// `CPUEMRx`
    EventMask(usize),
    /// `CPUPRx`. Write-one-to-clear.
    Pending(usize),
    /// `SBS_EXTICRx`
    PortSelect(usize),
}

/// Access to the EXTI registers.
///
/// Both methods take `&self`: the registers are shared between thread and
/// interrupt context and implementations are expected to provide interior
/// mutability (volatile cells, in the hardware case).
pub trait ExtiRegisters {
    fn read(&self, reg: Register) -> u32;
    fn write(&self, reg: Register, value: u32);
}

impl<T: ExtiRegisters + ?Sized> ExtiRegisters for &T {
    #[inline(always)]
    fn read(&self, reg: Register) -> u32 {
        (**self).read(reg)
    }

    #[inline(always)]
    fn write(&self, reg: Register, value: u32) {
        (**self).write(reg, value)
    }
}

/// Per-bank trigger configuration registers, repeated every 0x20 bytes.
#[repr(C)]
pub struct ConfigBank {
    pub rtsr: VolatileCell<u32>,
    pub ftsr: VolatileCell<u32>,
    pub swier: VolatileCell<u32>,
    _reserved: [u32; 5],
}

/// Per-bank CPU mask and pending registers, repeated every 0x10 bytes.
#[repr(C)]
pub struct CpuBank {
    pub imr: VolatileCell<u32>,
    pub emr: VolatileCell<u32>,
    pub pr: VolatileCell<u32>,
    _reserved: u32,
}

#[repr(C)]
pub struct RegisterBlock {
    pub config: [ConfigBank; BANK_COUNT],
    _reserved: [u32; 8],
    pub cpu: [CpuBank; BANK_COUNT],
}

#[repr(C)]
pub struct PortMuxBlock {
    pub exticr: [VolatileCell<u32>; EXTICR_COUNT],
}

const_assert_eq!(core::mem::size_of::<ConfigBank>(), 0x20);
const_assert_eq!(core::mem::size_of::<CpuBank>(), 0x10);
const_assert_eq!(core::mem::offset_of!(RegisterBlock, cpu), 0x80);
const_assert_eq!(core::mem::size_of::<PortMuxBlock>(), 0x10);

/// The memory-mapped EXTI and SBS multiplexer registers.
#[derive(Copy, Clone)]
pub struct Mmio {
    exti: &'static RegisterBlock,
    sbs: &'static PortMuxBlock,
}

impl Mmio {
    /// # Safety
    ///
    /// Must only be called on an H7R/S part, where [`EXTI_BASE`] and
    /// [`SBS_EXTICR_BASE`] are the peripheral addresses. Nothing stops two
    /// `Mmio`s from existing at once; the driver's masked read-modify-write
    /// discipline is what keeps them from stepping on each other's lines,
    /// and it does not protect against two writers to the same word.
    pub unsafe fn new() -> Self {
        Self {
            exti: unsafe { &*(EXTI_BASE as *const RegisterBlock) },
            sbs: unsafe { &*(SBS_EXTICR_BASE as *const PortMuxBlock) },
        }
    }

    fn cell(&self, reg: Register) -> &VolatileCell<u32> {
        match reg {
            Register::RisingTrigger(b) => &self.exti.config[b].rtsr,
            Register::FallingTrigger(b) => &self.exti.config[b].ftsr,
            Register::SoftwareTrigger(b) => &self.exti.config[b].swier,
            Register::InterruptMask(b) => &self.exti.cpu[b].imr,
            Register::EventMask(b) => &self.exti.cpu[b].emr,
            Register::Pending(b) => &self.exti.cpu[b].pr,
            Register::PortSelect(i) => &self.sbs.exticr[i],
        }
    }
}

impl ExtiRegisters for Mmio {
    #[inline(always)]
    fn read(&self, reg: Register) -> u32 {
        self.cell(reg).get()
    }

    #[inline(always)]
    fn write(&self, reg: Register, value: u32) {
        self.cell(reg).set(value)
    }
}

/// Locates the multiplexer field for GPIO pin `pin`: which `EXTICRx` it
/// lives in, and how far it's shifted.
#[inline(always)]
pub const fn port_select_field(pin: u32) -> (usize, u32) {
    ((pin >> 2) as usize, EXTICR_FIELD_BITS * (pin & 0b11))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_select_fields() {
        assert_eq!(port_select_field(0), (0, 0));
        assert_eq!(port_select_field(1), (0, 4));
        assert_eq!(port_select_field(3), (0, 12));
        assert_eq!(port_select_field(4), (1, 0));
        assert_eq!(port_select_field(13), (3, 4));
        assert_eq!(port_select_field(15), (3, 12));
    }

    #[test]
    fn register_block_offsets() {
        assert_eq!(core::mem::offset_of!(ConfigBank, swier), 0x08);
        assert_eq!(core::mem::offset_of!(CpuBank, pr), 0x08);
        assert_eq!(core::mem::size_of::<RegisterBlock>(), 0x80 + 3 * 0x10);
    }
}
