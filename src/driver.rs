//! Low-level LS7366R transfer primitives.
//!
//! Every primitive runs inside exactly one [`Transaction`]: chip select low,
//! settings pushed, bytes shifted, transaction ended, chip select high.
//!
//! This module is crate-private — consumers interact with
//! [`Ls7366r`](crate::Ls7366r) in `counter.rs` instead.

use embedded_hal::digital::OutputPin;

use crate::bus::{CounterBus, SpiSettings};
use crate::error::CounterError;

type Error<BUS, CS> = CounterError<<BUS as CounterBus>::Error, <CS as embedded_hal::digital::ErrorType>::Error>;

/// Scoped chip-select framing.
///
/// [`finish`](Transaction::finish) releases the bus and reports failures.
/// If the guard is dropped early (an error propagated with `?`), the
/// transaction is still ended and the chip deselected, ignoring errors.
struct Transaction<'a, BUS, CS>
where
    BUS: CounterBus,
    CS: OutputPin,
{
    bus: &'a mut BUS,
    cs: &'a mut CS,
    open: bool,
}

impl<'a, BUS, CS> Transaction<'a, BUS, CS>
where
    BUS: CounterBus,
    CS: OutputPin,
{
    fn start(
        bus: &'a mut BUS,
        cs: &'a mut CS,
        settings: &SpiSettings,
    ) -> Result<Self, Error<BUS, CS>> {
        cs.set_low().map_err(CounterError::ChipSelect)?;
        if let Err(e) = bus.begin_transaction(settings) {
            let _ = cs.set_high();
            return Err(CounterError::Bus(e));
        }
        Ok(Self { bus, cs, open: true })
    }

    /// Clock out `bytes`, discarding whatever comes back.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error<BUS, CS>> {
        for &byte in bytes {
            self.bus.transfer_byte(byte).map_err(CounterError::Bus)?;
        }
        Ok(())
    }

    /// Clock in `buffer.len()` bytes by sending zeros.
    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Error<BUS, CS>> {
        for slot in buffer.iter_mut() {
            *slot = self.bus.transfer_byte(0x00).map_err(CounterError::Bus)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<(), Error<BUS, CS>> {
        self.open = false;
        let ended = self.bus.end_transaction().map_err(CounterError::Bus);
        let deselected = self.cs.set_high().map_err(CounterError::ChipSelect);
        ended.and(deselected)
    }
}

impl<BUS, CS> Drop for Transaction<'_, BUS, CS>
where
    BUS: CounterBus,
    CS: OutputPin,
{
    fn drop(&mut self) {
        if self.open {
            let _ = self.bus.end_transaction();
            let _ = self.cs.set_high();
        }
    }
}

/// Owns the bus and chip select and shifts framed byte sequences.
pub(crate) struct SpiDriver<BUS, CS> {
    pub(crate) bus: BUS,
    pub(crate) cs: CS,
    settings: SpiSettings,
}

impl<BUS, CS> SpiDriver<BUS, CS>
where
    BUS: CounterBus,
    CS: OutputPin,
{
    pub fn new(bus: BUS, cs: CS, settings: SpiSettings) -> Self {
        Self { bus, cs, settings }
    }

    pub fn settings(&self) -> &SpiSettings {
        &self.settings
    }

    pub fn release(self) -> (BUS, CS) {
        (self.bus, self.cs)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Claim the bus and park chip select high.
    pub fn begin(&mut self) -> Result<(), Error<BUS, CS>> {
        self.bus.begin().map_err(CounterError::Bus)?;
        self.cs.set_high().map_err(CounterError::ChipSelect)
    }

    /// Release the bus, leaving chip select deasserted.
    pub fn end(&mut self) -> Result<(), Error<BUS, CS>> {
        let ended = self.bus.end().map_err(CounterError::Bus);
        let deselected = self.cs.set_high().map_err(CounterError::ChipSelect);
        ended.and(deselected)
    }

    // -----------------------------------------------------------------------
    // Core protocol primitives
    // -----------------------------------------------------------------------

    /// Shift out `write`, then shift in `read`, in one transaction.
    ///
    /// `read` is zero-filled first. A missing buffer is rejected before
    /// the bus is touched.
    pub fn transfer(
        &mut self,
        write: Option<&[u8]>,
        read: Option<&mut [u8]>,
    ) -> Result<(), Error<BUS, CS>> {
        let (Some(write), Some(read)) = (write, read) else {
            return Err(CounterError::InvalidBuffer);
        };

        read.fill(0);

        let mut tx = Transaction::start(&mut self.bus, &mut self.cs, &self.settings)?;
        tx.write(write)?;
        tx.read(read)?;
        tx.finish()
    }

    /// Send a bare instruction byte (clear / load).
    pub fn write_command(&mut self, command: u8) -> Result<(), Error<BUS, CS>> {
        let mut tx = Transaction::start(&mut self.bus, &mut self.cs, &self.settings)?;
        tx.write(&[command])?;
        tx.finish()
    }

    /// Send an instruction byte followed by `data`.
    pub fn write_data(&mut self, command: u8, data: &[u8]) -> Result<(), Error<BUS, CS>> {
        let mut tx = Transaction::start(&mut self.bus, &mut self.cs, &self.settings)?;
        tx.write(&[command])?;
        tx.write(data)?;
        tx.finish()
    }

    /// Send an instruction byte and read back a single byte.
    pub fn read_register(&mut self, command: u8) -> Result<u8, Error<BUS, CS>> {
        let mut rx = [0u8; 1];
        self.transfer(Some(&[command]), Some(&mut rx))?;
        Ok(rx[0])
    }

    /// Send an instruction byte and fill `buffer` with the response.
    pub fn read_data(&mut self, command: u8, buffer: &mut [u8]) -> Result<(), Error<BUS, CS>> {
        self.transfer(Some(&[command]), Some(buffer))
    }
}
