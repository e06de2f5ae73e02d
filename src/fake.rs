//! Simulated LS7366R used by the unit tests.
//!
//! The chip only listens while its chip-select line (shared with
//! [`FakePin`] through a `Cell`) is low, like the real part. Each
//! transaction is decoded when it ends: the first byte is the instruction,
//! the rest is payload. Read responses are queued as soon as the
//! instruction byte arrives.

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use heapless::Vec;

use crate::bus::{CounterBus, SpiSettings};
use crate::registers::*;
use crate::width::{assemble_be, RegisterWidth};

pub type Frame = Vec<u8, 16>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeBusError;

/// Chip-select pin wired to a [`FakeChip`].
pub struct FakePin<'a> {
    pub high: &'a Cell<bool>,
}

impl ErrorType for FakePin<'_> {
    type Error = Infallible;
}

impl OutputPin for FakePin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high.set(true);
        Ok(())
    }
}

pub struct FakeChip<'a> {
    cs_high: &'a Cell<bool>,

    pub mdr0: u8,
    pub mdr1: u8,
    pub dtr: u32,
    pub cntr: u32,
    pub otr: u32,
    /// Latched STR bits; CEN is derived from MDR1 on read.
    pub status: u8,

    /// Instruction + payload bytes of every completed transaction.
    pub frames: Vec<Frame, 64>,
    /// Total number of `CounterBus` calls.
    pub calls: usize,
    /// Bytes shifted while deselected, or transaction hooks called while
    /// deselected.
    pub framing_violations: usize,
    pub began: bool,
    pub ended: bool,
    pub last_settings: Option<SpiSettings>,
    /// Fail the n-th `transfer_byte` call (0-based, counted across frames).
    pub fail_at_byte: Option<usize>,

    current: Frame,
    response: Frame,
    bytes_seen: usize,
}

impl<'a> FakeChip<'a> {
    pub fn new(cs_high: &'a Cell<bool>) -> Self {
        Self {
            cs_high,
            mdr0: 0,
            mdr1: 0,
            dtr: 0,
            cntr: 0,
            otr: 0,
            status: 0,
            frames: Vec::new(),
            calls: 0,
            framing_violations: 0,
            began: false,
            ended: false,
            last_settings: None,
            fail_at_byte: None,
            current: Vec::new(),
            response: Vec::new(),
            bytes_seen: 0,
        }
    }

    fn width(&self) -> usize {
        RegisterWidth::from_mdr1(self.mdr1).bytes()
    }

    fn str_value(&self) -> u8 {
        let cen = if self.mdr1 & MDR1_DISABLE == 0 {
            STR_COUNT_ENABLED
        } else {
            0
        };
        self.status | cen
    }

    fn queue_wide(&mut self, value: u32) {
        let n = self.width();
        for &b in &value.to_be_bytes()[4 - n..] {
            let _ = self.response.push(b);
        }
    }

    fn on_instruction(&mut self, instruction: u8) {
        self.response.clear();
        if instruction & 0xC0 != CMD_RD {
            return;
        }
        match instruction & 0x38 {
            REG_MDR0 => {
                let _ = self.response.push(self.mdr0);
            }
            REG_MDR1 => {
                let _ = self.response.push(self.mdr1);
            }
            REG_STR => {
                let s = self.str_value();
                let _ = self.response.push(s);
            }
            REG_DTR => self.queue_wide(self.dtr),
            REG_CNTR => self.queue_wide(self.cntr),
            REG_OTR => self.queue_wide(self.otr),
            _ => {}
        }
    }

    fn execute(&mut self) {
        let Some((&instruction, payload)) = self.current.split_first() else {
            return;
        };
        let register = instruction & 0x38;
        match instruction & 0xC0 {
            CMD_CLR => match register {
                REG_MDR0 => self.mdr0 = 0,
                REG_MDR1 => self.mdr1 = 0,
                REG_CNTR => self.cntr = 0,
                // CEN and U/D survive a status clear.
                REG_STR => self.status &= STR_UP,
                _ => {}
            },
            CMD_WR => match (register, payload.first()) {
                (REG_MDR0, Some(&b)) => self.mdr0 = b,
                (REG_MDR1, Some(&b)) => self.mdr1 = b,
                (REG_DTR, Some(_)) => self.dtr = assemble_be(payload),
                _ => {}
            },
            CMD_LOAD => match register {
                REG_CNTR => self.cntr = self.dtr,
                REG_OTR => self.otr = self.cntr,
                _ => {}
            },
            _ => {}
        }
    }
}

impl CounterBus for FakeChip<'_> {
    type Error = FakeBusError;

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.calls += 1;
        self.began = true;
        Ok(())
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        self.calls += 1;
        self.ended = true;
        Ok(())
    }

    fn begin_transaction(&mut self, settings: &SpiSettings) -> Result<(), Self::Error> {
        self.calls += 1;
        if self.cs_high.get() {
            self.framing_violations += 1;
        }
        self.last_settings = Some(*settings);
        self.current.clear();
        self.response.clear();
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), Self::Error> {
        self.calls += 1;
        if self.cs_high.get() {
            self.framing_violations += 1;
        }
        self.execute();
        let frame = self.current.clone();
        let _ = self.frames.push(frame);
        self.current.clear();
        Ok(())
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        self.calls += 1;
        let index = self.bytes_seen;
        self.bytes_seen += 1;
        if self.fail_at_byte == Some(index) {
            return Err(FakeBusError);
        }
        if self.cs_high.get() {
            self.framing_violations += 1;
            return Ok(0xFF);
        }

        let position = self.current.len();
        let _ = self.current.push(byte);
        if position == 0 {
            self.on_instruction(byte);
            return Ok(0x00);
        }
        Ok(self.response.get(position - 1).copied().unwrap_or(0x00))
    }
}

#[cfg(feature = "async")]
impl crate::asynch::AsyncCounterBus for FakeChip<'_> {
    type Error = FakeBusError;

    async fn begin(&mut self) -> Result<(), Self::Error> {
        CounterBus::begin(self)
    }

    async fn end(&mut self) -> Result<(), Self::Error> {
        CounterBus::end(self)
    }

    async fn begin_transaction(&mut self, settings: &SpiSettings) -> Result<(), Self::Error> {
        CounterBus::begin_transaction(self, settings)
    }

    async fn end_transaction(&mut self) -> Result<(), Self::Error> {
        CounterBus::end_transaction(self)
    }

    async fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        CounterBus::transfer_byte(self, byte)
    }
}
