// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! An in-memory stand-in for the EXTI and SBS multiplexer registers.
//!
//! Plain registers store what's written. `Pending` is write-one-to-clear and
//! `SoftwareTrigger` is write-one-to-set, mirrored into `Pending`, so that a
//! driver doing read-modify-write on either shows up as sibling lines being
//! disturbed.

#![allow(dead_code)]

use std::cell::Cell;

use drv_stm32h7rs_exti::regs::{
    ExtiRegisters, Register, BANK_COUNT, EXTICR_COUNT,
};
use drv_stm32h7rs_exti_api::Line;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Snapshot {
    pub rtsr: [u32; BANK_COUNT],
    pub ftsr: [u32; BANK_COUNT],
    pub swier: [u32; BANK_COUNT],
    pub imr: [u32; BANK_COUNT],
    pub emr: [u32; BANK_COUNT],
    pub pr: [u32; BANK_COUNT],
    pub exticr: [u32; EXTICR_COUNT],
}

#[derive(Default)]
pub struct FakeExti {
    state: Cell<Snapshot>,
    writes: Cell<usize>,
}

impl FakeExti {
    pub fn snapshot(&self) -> Snapshot {
        self.state.get()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Latches an edge on `line`, as the hardware would when its selected
    /// trigger arrives.
    pub fn raise(&self, line: Line) {
        let mut s = self.state.get();
        s.pr[line.bank()] |= line.mask();
        self.state.set(s);
    }

    /// Fills every register with `value`, bypassing the write counter.
    pub fn fill(&self, value: u32) {
        self.state.set(Snapshot {
            rtsr: [value; BANK_COUNT],
            ftsr: [value; BANK_COUNT],
            swier: [0; BANK_COUNT],
            imr: [value; BANK_COUNT],
            emr: [value; BANK_COUNT],
            pr: [value; BANK_COUNT],
            exticr: [value & 0xffff; EXTICR_COUNT],
        });
    }
}

impl ExtiRegisters for FakeExti {
    fn read(&self, reg: Register) -> u32 {
        let s = self.state.get();
        match reg {
            Register::RisingTrigger(b) => s.rtsr[b],
            Register::FallingTrigger(b) => s.ftsr[b],
            Register::SoftwareTrigger(b) => s.swier[b],
            Register::InterruptMask(b) => s.imr[b],
            Register::EventMask(b) => s.emr[b],
            Register::Pending(b) => s.pr[b],
            Register::PortSelect(i) => s.exticr[i],
        }
    }

    fn write(&self, reg: Register, value: u32) {
        self.writes.set(self.writes.get() + 1);
        let mut s = self.state.get();
        match reg {
            Register::RisingTrigger(b) => s.rtsr[b] = value,
            Register::FallingTrigger(b) => s.ftsr[b] = value,
            Register::SoftwareTrigger(b) => {
                s.swier[b] |= value;
                s.pr[b] |= value;
            }
            Register::InterruptMask(b) => s.imr[b] = value,
            Register::EventMask(b) => s.emr[b] = value,
            Register::Pending(b) => {
                // Clearing a pending bit also drops its software request.
                s.pr[b] &= !value;
                s.swier[b] &= !value;
            }
            // Only the low 16 bits of EXTICRx are implemented.
            Register::PortSelect(i) => s.exticr[i] = value & 0xffff,
        }
        self.state.set(s);
    }
}
