//! Bus capability required by the driver.
//!
//! The LS7366R only needs "push the SPI settings, then shift bytes
//! full-duplex". [`CounterBus`] captures exactly that, so the driver can sit
//! on a HAL SPI peripheral ([`HalBus`]), a bit-banged bus, or a test double.

use core::convert::Infallible;
use core::fmt;

use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal::spi::{Mode, SpiBus, MODE_0};

use crate::registers::DEFAULT_FREQUENCY_HZ;

/// Bit order on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Electrical settings pushed at the start of every transaction.
///
/// The LS7366R default is 100 kHz, MSB first, SPI mode 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiSettings {
    frequency_hz: u32,
    bit_order: BitOrder,
    mode: Mode,
}

impl SpiSettings {
    pub const fn new(frequency_hz: u32, bit_order: BitOrder, mode: Mode) -> Self {
        Self {
            frequency_hz,
            bit_order,
            mode,
        }
    }

    pub const fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    pub const fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }
}

impl Default for SpiSettings {
    fn default() -> Self {
        Self::new(DEFAULT_FREQUENCY_HZ, BitOrder::MsbFirst, MODE_0)
    }
}

/// Full-duplex byte transfer capability.
///
/// Only [`transfer_byte`](CounterBus::transfer_byte) is mandatory; buses
/// that are configured once at start-up can keep the default no-op
/// lifecycle and transaction hooks.
pub trait CounterBus {
    type Error: fmt::Debug;

    /// Claim the bus.
    fn begin(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Release the bus.
    fn end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply `settings` for the transaction that follows.
    fn begin_transaction(&mut self, _settings: &SpiSettings) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Finish the current transaction; all bytes must be on the wire.
    fn end_transaction(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Send one byte and return the byte clocked in at the same time.
    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error>;
}

/// [`CounterBus`] adapter for any `embedded-hal` [`SpiBus`].
///
/// `embedded-hal` has no runtime reconfiguration, so the peripheral must be
/// built with settings matching [`SpiSettings::default()`] (or whatever the
/// driver was constructed with).
pub struct HalBus<SPI> {
    spi: SPI,
}

impl<SPI> HalBus<SPI> {
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI bus.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> CounterBus for HalBus<SPI>
where
    SPI: SpiBus<u8>,
{
    type Error = SPI::Error;

    fn end(&mut self) -> Result<(), Self::Error> {
        self.spi.flush()
    }

    fn end_transaction(&mut self) -> Result<(), Self::Error> {
        self.spi.flush()
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut buf = [byte];
        self.spi.transfer_in_place(&mut buf)?;
        Ok(buf[0])
    }
}

/// Chip select for buses that drive their own default CS line.
///
/// Every level change is a no-op; framing is left to the peripheral.
#[derive(Debug, Default, Clone, Copy)]
pub struct BusChipSelect;

impl ErrorType for BusChipSelect {
    type Error = Infallible;
}

impl OutputPin for BusChipSelect {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ls7366r;
    use core::cell::RefCell;
    use embedded_hal::spi::{Phase, Polarity};
    use heapless::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        CsLow,
        CsHigh,
        /// One `transfer_in_place` call: buffer length and first byte sent.
        Shift { len: usize, sent: u8 },
        Flush,
        Other,
    }

    type Log = RefCell<Vec<Event, 32>>;

    /// `SpiBus` double answering every byte with `reply`.
    struct RecordingSpi<'a> {
        log: &'a Log,
        reply: u8,
    }

    impl RecordingSpi<'_> {
        fn record(&self, event: Event) {
            let _ = self.log.borrow_mut().push(event);
        }
    }

    impl embedded_hal::spi::ErrorType for RecordingSpi<'_> {
        type Error = Infallible;
    }

    impl SpiBus<u8> for RecordingSpi<'_> {
        fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
            self.record(Event::Other);
            words.fill(self.reply);
            Ok(())
        }

        fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> {
            self.record(Event::Other);
            Ok(())
        }

        fn transfer(&mut self, read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
            self.record(Event::Other);
            read.fill(self.reply);
            Ok(())
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
            self.record(Event::Shift {
                len: words.len(),
                sent: words.first().copied().unwrap_or(0),
            });
            words.fill(self.reply);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.record(Event::Flush);
            Ok(())
        }
    }

    struct RecordingPin<'a> {
        log: &'a Log,
    }

    impl ErrorType for RecordingPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for RecordingPin<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            let _ = self.log.borrow_mut().push(Event::CsLow);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            let _ = self.log.borrow_mut().push(Event::CsHigh);
            Ok(())
        }
    }

    // ── HalBus ───────────────────────────────────────────────────────

    #[test]
    fn hal_bus_shifts_single_bytes_and_flushes_before_deselect() {
        let log: Log = RefCell::new(Vec::new());
        let spi = RecordingSpi { log: &log, reply: 0xC3 };
        let mut counter = Ls7366r::new(HalBus::new(spi), RecordingPin { log: &log });

        assert_eq!(counter.read_status().unwrap(), 0xC3);

        assert_eq!(
            log.borrow().as_slice(),
            &[
                Event::CsLow,
                Event::Shift { len: 1, sent: 0x70 },
                Event::Shift { len: 1, sent: 0x00 },
                Event::Flush,
                Event::CsHigh,
            ]
        );
    }

    #[test]
    fn hal_bus_end_flushes() {
        let log: Log = RefCell::new(Vec::new());
        let mut bus = HalBus::new(RecordingSpi { log: &log, reply: 0 });

        bus.begin().unwrap();
        bus.begin_transaction(&SpiSettings::default()).unwrap();
        assert!(log.borrow().is_empty());

        bus.end().unwrap();
        assert_eq!(log.borrow().as_slice(), &[Event::Flush]);
    }

    #[test]
    fn default_settings_are_slow_msb_mode0() {
        let s = SpiSettings::default();
        assert_eq!(s.frequency_hz(), 100_000);
        assert_eq!(s.bit_order(), BitOrder::MsbFirst);
        assert_eq!(s.mode().polarity, Polarity::IdleLow);
        assert_eq!(s.mode().phase, Phase::CaptureOnFirstTransition);
    }
}
