// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Driver for the STM32H7R/S extended interrupt and event controller (EXTI).
//!
//! The EXTI sits between interrupt sources (GPIO pins, and a long list of
//! peripherals) and the NVIC. Each source is a numbered _line_. For each line
//! the driver can
//!
//! - enable it as an interrupt to the CPU, an event to the CPU, or both,
//! - choose which edges set its pending bit (configurable lines only),
//! - for lines 0-15, choose which GPIO port feeds it,
//! - poll, clear, or software-trigger its pending bit, and
//! - service its interrupt by clearing the pending bit and calling back.
//!
//! Line state lives in a [`LineHandle`], which is cheap enough to keep in a
//! `static` next to the interrupt vector that services it. The [`Exti`]
//! itself holds nothing but a way to reach the registers.
//!
//! # Register discipline
//!
//! Up to 32 lines share each register word. Mask and trigger registers are
//! only ever updated with a full-word read, a change to this line's bit, and
//! a full-word write. Pending and software trigger registers are
//! write-one-to-act, and are written with _only_ this line's bit set; a
//! read-modify-write there would clear (or re-trigger) every other line that
//! happened to be pending in the same bank.
//!
//! # Contract checks
//!
//! Bad line identifiers, impossible mode bits, event mode on a line without
//! event support, and pending operations on direct lines are caught with
//! `debug_assert!`. Release builds don't check; they just write whatever the
//! arithmetic produces.
//!
//! # Concurrency
//!
//! There is no locking. If a line's interrupt can fire while its bank is
//! being reconfigured, the read-modify-write here can race with the interrupt
//! handler's pending clear. Mask the line at the NVIC first if that matters.

#![cfg_attr(target_os = "none", no_std)]

use drv_stm32h7rs_exti_api::{
    CallbackId, ExtiConfig, ExtiError, Line, Mode, Port, Trigger,
};

pub mod regs;

use regs::{ExtiRegisters, Mmio, Register, EXTICR_FIELD_MASK};

/// The per-line state: which line, and what to call when it fires.
#[derive(Copy, Clone, Debug, Default)]
pub struct LineHandle {
    line: Option<Line>,
    callback: Option<fn()>,
}

impl LineHandle {
    /// Creates a handle that isn't bound to a line yet. Configuration calls
    /// on it fail with [`ExtiError::Unbound`] until [`LineHandle::bind`] or
    /// [`Exti::set_config`] gives it one.
    pub const fn new() -> Self {
        Self {
            line: None,
            callback: None,
        }
    }

    /// Creates a handle already bound to `line`, for use in `static`s. The
    /// line is checked like [`LineHandle::bind`] checks it.
    pub const fn for_line(line: Line) -> Self {
        debug_assert!(line.is_valid(), "invalid EXTI line");
        Self {
            line: Some(line),
            callback: None,
        }
    }

    /// Attaches this handle to `line`. The callback, if any, is kept.
    pub fn bind(&mut self, line: Line) {
        debug_assert!(
            line.is_valid(),
            "invalid EXTI line {:#010x}",
            line.raw(),
        );
        log::debug!("exti: bind line {}", line.number());
        self.line = Some(line);
    }

    pub fn line(&self) -> Option<Line> {
        self.line
    }

    /// Sets the function called from [`Exti::handle_interrupt`], replacing
    /// any earlier one. There is one slot per handle.
    pub fn register_callback(
        &mut self,
        id: CallbackId,
        callback: fn(),
    ) -> Result<(), ExtiError> {
        match id {
            CallbackId::Common => {
                log::debug!("exti: callback registered for {:?}", self.line);
                self.callback = Some(callback);
                Ok(())
            }
            CallbackId::Rising | CallbackId::Falling => {
                Err(ExtiError::UnsupportedCallback)
            }
        }
    }

    fn bound(&self) -> Result<Line, ExtiError> {
        self.line.ok_or(ExtiError::Unbound)
    }

    // For the pending-bit operations, which have no error path: an unbound
    // handle is a contract violation like any other.
    fn configurable_line(&self) -> Option<Line> {
        debug_assert!(self.line.is_some(), "EXTI handle is not bound");
        let line = self.line?;
        debug_assert!(
            line.is_valid(),
            "invalid EXTI line {:#010x}",
            line.raw(),
        );
        debug_assert!(
            line.is_configurable(),
            "EXTI line {} has no pending register",
            line.number(),
        );
        Some(line)
    }
}

/// The EXTI controller, reached through `R`.
pub struct Exti<R = Mmio> {
    regs: R,
}

impl Exti<Mmio> {
    /// # Safety
    ///
    /// See [`Mmio::new`].
    pub unsafe fn from_device() -> Self {
        Self::new(unsafe { Mmio::new() })
    }
}

impl<R: ExtiRegisters> Exti<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Sets or clears `line`'s bit in `reg`, preserving every other bit.
    #[inline(always)]
    fn update_bit(&self, reg: Register, line: Line, set: bool) {
        let mut val = self.regs.read(reg);
        if set {
            val |= line.mask();
        } else {
            val &= !line.mask();
        }
        self.regs.write(reg, val);
    }

    /// Rewrites the multiplexer field for a GPIO line's pin, preserving the
    /// other three fields in the same `EXTICRx`.
    fn update_port_select(&self, line: Line, selector: u32) {
        debug_assert!(line.pin() < 16);
        let (index, shift) = regs::port_select_field(line.pin());
        let reg = Register::PortSelect(index);
        let mut val = self.regs.read(reg);
        val &= !(EXTICR_FIELD_MASK << shift);
        val |= (selector & EXTICR_FIELD_MASK) << shift;
        self.regs.write(reg, val);
    }

    /// Applies `config` to `config.line` and binds `handle` to that line.
    ///
    /// Trigger and port settings are only written for lines that have those
    /// registers; for other lines they're ignored.
    pub fn set_config(
        &self,
        handle: &mut LineHandle,
        config: &ExtiConfig,
    ) -> Result<(), ExtiError> {
        let line = config.line;
        debug_assert!(
            line.is_valid(),
            "invalid EXTI line {:#010x}",
            line.raw(),
        );
        debug_assert!(
            Mode::all().contains(config.mode),
            "invalid EXTI mode {:#x}",
            config.mode.bits(),
        );

        handle.line = Some(line);

        let bank = line.bank();

        if line.is_configurable() {
            debug_assert!(
                Trigger::all().contains(config.trigger),
                "invalid EXTI trigger {:#x}",
                config.trigger.bits(),
            );
            self.update_bit(
                Register::RisingTrigger(bank),
                line,
                config.trigger.contains(Trigger::RISING),
            );
            self.update_bit(
                Register::FallingTrigger(bank),
                line,
                config.trigger.contains(Trigger::FALLING),
            );

            if line.is_gpio() {
                self.update_port_select(line, config.port.selector());
            }
        }

        self.update_bit(
            Register::InterruptMask(bank),
            line,
            config.mode.contains(Mode::INTERRUPT),
        );

        debug_assert!(
            line.supports_event() || !config.mode.contains(Mode::EVENT),
            "EXTI line {} cannot generate events",
            line.number(),
        );
        self.update_bit(
            Register::EventMask(bank),
            line,
            config.mode.contains(Mode::EVENT),
        );

        log::debug!(
            "exti: line {} mode {:?} trigger {:?} port {:?}",
            line.number(),
            config.mode,
            config.trigger,
            config.port,
        );
        Ok(())
    }

    /// Reads back the configuration of `handle`'s line.
    pub fn get_config(
        &self,
        handle: &LineHandle,
    ) -> Result<ExtiConfig, ExtiError> {
        let line = handle.bound()?;
        debug_assert!(
            line.is_valid(),
            "invalid EXTI line {:#010x}",
            line.raw(),
        );

        let bank = line.bank();
        let mut config = ExtiConfig::new(line);

        if self.regs.read(Register::InterruptMask(bank)) & line.mask() != 0 {
            config.mode |= Mode::INTERRUPT;
        }
        if self.regs.read(Register::EventMask(bank)) & line.mask() != 0 {
            config.mode |= Mode::EVENT;
        }

        if line.is_configurable() {
            if self.regs.read(Register::RisingTrigger(bank)) & line.mask() != 0
            {
                config.trigger |= Trigger::RISING;
            }
            if self.regs.read(Register::FallingTrigger(bank)) & line.mask()
                != 0
            {
                config.trigger |= Trigger::FALLING;
            }

            if line.is_gpio() {
                let (index, shift) = regs::port_select_field(line.pin());
                let sel = (self.regs.read(Register::PortSelect(index))
                    >> shift)
                    & EXTICR_FIELD_MASK;
                // Someone else wrote a selector we never would; report it as
                // the default rather than invent a port.
                let port = Port::from_selector(sel);
                debug_assert!(
                    port.is_some(),
                    "unknown EXTI port selector {sel}",
                );
                config.port = port.unwrap_or(Port::A);
            }
        }

        Ok(config)
    }

    /// Turns `handle`'s line off: no interrupt, no event, no edges, and (for
    /// GPIO lines) the multiplexer back to port A. Pending state and the
    /// handle's callback are left alone.
    pub fn clear_config(&self, handle: &LineHandle) -> Result<(), ExtiError> {
        let line = handle.bound()?;
        debug_assert!(
            line.is_valid(),
            "invalid EXTI line {:#010x}",
            line.raw(),
        );

        let bank = line.bank();
        self.update_bit(Register::InterruptMask(bank), line, false);
        self.update_bit(Register::EventMask(bank), line, false);

        if line.is_configurable() {
            self.update_bit(Register::RisingTrigger(bank), line, false);
            self.update_bit(Register::FallingTrigger(bank), line, false);

            if line.is_gpio() {
                self.update_port_select(line, 0);
            }
        }

        log::debug!("exti: line {} cleared", line.number());
        Ok(())
    }

    /// Services an interrupt for `handle`'s line. Meant to be called from the
    /// ISR for the NVIC vector the line is routed to.
    ///
    /// If the line is pending, its pending bit is cleared and the handle's
    /// callback (if any) runs, in this context, before this returns. If it
    /// isn't pending, no register is written.
    pub fn handle_interrupt(&self, handle: &LineHandle) {
        let Some(line) = handle.line else {
            return;
        };
        let reg = Register::Pending(line.bank());

        if self.regs.read(reg) & line.mask() != 0 {
            self.regs.write(reg, line.mask());
            log::trace!("exti: line {} serviced", line.number());

            if let Some(callback) = handle.callback {
                callback();
            }
        }
    }

    /// Checks whether `handle`'s line is pending, without clearing it.
    pub fn pending(&self, handle: &LineHandle) -> bool {
        let Some(line) = handle.configurable_line() else {
            return false;
        };
        self.regs.read(Register::Pending(line.bank())) & line.mask() != 0
    }

    /// Clears `handle`'s pending bit whether or not it was set.
    pub fn clear_pending(&self, handle: &LineHandle) {
        let Some(line) = handle.configurable_line() else {
            return;
        };
        self.regs.write(Register::Pending(line.bank()), line.mask());
        log::trace!("exti: line {} pending cleared", line.number());
    }

    /// Sets `handle`'s pending bit from software, as if its selected edge had
    /// arrived. Whether that reaches the CPU depends on the line's mode.
    pub fn generate_software_interrupt(&self, handle: &LineHandle) {
        let Some(line) = handle.configurable_line() else {
            return;
        };
        self.regs
            .write(Register::SoftwareTrigger(line.bank()), line.mask());
        log::trace!("exti: line {} software trigger", line.number());
    }
}
