//! High-level interface for the LS7366R quadrature counter.
//!
//! [`Ls7366r`] turns register operations into framed SPI transactions and
//! tracks the register width selected by the last [`configure`](Ls7366r::configure).

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::bus::{CounterBus, SpiSettings};
use crate::driver::SpiDriver;
use crate::error::CounterError;
use crate::mode::{Mdr0, Mdr1};
use crate::registers::*;
use crate::status::Status;
use crate::width::{assemble_be, disassemble_be, payload_len, RegisterWidth};

/// Error type returned by every [`Ls7366r`] operation.
pub type Error<BUS, CS> = CounterError<<BUS as CounterBus>::Error, <CS as ErrorType>::Error>;

/// Driver for one LS7366R on a shared or dedicated SPI bus.
///
/// Each handle keeps its own register width, so several counters can share
/// a bus (each with its own chip select) without stepping on each other.
///
/// # Example
///
/// ```no_run
/// use ls7366r_counter::{HalBus, Ls7366r};
///
/// # fn example<SPI, CS>(spi: SPI, cs: CS)
/// # where SPI: embedded_hal::spi::SpiBus, CS: embedded_hal::digital::OutputPin {
/// let mut counter = Ls7366r::new(HalBus::new(spi), cs);
/// counter.begin().unwrap();
/// counter.default_configuration().unwrap();
///
/// let count = counter.read_counter().unwrap();
/// # }
/// ```
pub struct Ls7366r<BUS, CS> {
    driver: SpiDriver<BUS, CS>,
    width: Option<RegisterWidth>,
}

impl<BUS, CS> Ls7366r<BUS, CS>
where
    BUS: CounterBus,
    CS: OutputPin,
{
    /// Create a driver with the default settings (100 kHz, MSB first,
    /// mode 0).
    ///
    /// No bus traffic is generated; call [`begin`](Self::begin) first.
    pub fn new(bus: BUS, cs: CS) -> Self {
        Self::with_settings(bus, cs, SpiSettings::default())
    }

    /// Create a driver that pushes `settings` at the start of every
    /// transaction.
    pub fn with_settings(bus: BUS, cs: CS, settings: SpiSettings) -> Self {
        Self {
            driver: SpiDriver::new(bus, cs, settings),
            width: None,
        }
    }

    /// Bus settings pushed at the start of every transaction.
    pub fn settings(&self) -> &SpiSettings {
        self.driver.settings()
    }

    /// Width used for DTR, CNTR and OTR transfers; `None` until
    /// [`configure`](Self::configure) has run.
    pub fn register_width(&self) -> Option<RegisterWidth> {
        self.width
    }

    /// Hand back the bus and chip-select pin, e.g. to return the pin to an
    /// input after [`end`](Self::end).
    pub fn release(self) -> (BUS, CS) {
        self.driver.release()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Claim the bus and deselect the chip.
    pub fn begin(&mut self) -> Result<(), Error<BUS, CS>> {
        self.driver.begin()
    }

    /// Clear the counter, stop counting and release the bus.
    pub fn end(&mut self) -> Result<(), Error<BUS, CS>> {
        self.clear_counter()?;
        self.disable()?;
        self.driver.end()
    }

    /// Bring the chip into a known state: 4× quadrature, free-running,
    /// 32-bit registers, counter zeroed and counting enabled.
    pub fn default_configuration(&mut self) -> Result<(), Error<BUS, CS>> {
        self.configure(DEFAULT_MDR0, DEFAULT_MDR1)?;
        self.write_data_register(&[0u8; 4])?;
        self.clear_counter()?;
        self.load_counter_from_data()?;
        self.enable()
    }

    /// Write MDR0 then MDR1 and adopt the register width encoded in MDR1.
    ///
    /// Must run before any DTR, CNTR or OTR transfer. The stored width is
    /// not refreshed by later raw MDR1 writes such as
    /// [`write_mode1`](Self::write_mode1) or [`clear_mode1`](Self::clear_mode1).
    ///
    /// # Errors
    /// * [`CounterError::Bus`] / [`CounterError::ChipSelect`] on hardware
    ///   failure; the stored width is left unchanged.
    pub fn configure(&mut self, mdr0: u8, mdr1: u8) -> Result<(), Error<BUS, CS>> {
        self.write_mode0(mdr0)?;
        self.write_mode1(mdr1)?;

        let width = RegisterWidth::from_mdr1(mdr1);
        self.width = Some(width);

        #[cfg(feature = "defmt")]
        defmt::debug!("LS7366R configured: mdr0={=u8:#x} mdr1={=u8:#x} width={}", mdr0, mdr1, width);

        Ok(())
    }

    /// [`configure`](Self::configure) from typed settings.
    pub fn configure_modes(&mut self, mdr0: Mdr0, mdr1: Mdr1) -> Result<(), Error<BUS, CS>> {
        self.configure(mdr0.bits(), mdr1.bits())
    }

    /// Resume counting. Other MDR1 bits are preserved.
    pub fn enable(&mut self) -> Result<(), Error<BUS, CS>> {
        let mdr1 = self.read_mode1()? & !MDR1_DISABLE;
        self.write_mode1(mdr1)
    }

    /// Halt counting. Other MDR1 bits are preserved.
    pub fn disable(&mut self) -> Result<(), Error<BUS, CS>> {
        let mdr1 = self.read_mode1()? | MDR1_DISABLE;
        self.write_mode1(mdr1)
    }

    // -----------------------------------------------------------------------
    // Raw transfer
    // -----------------------------------------------------------------------

    /// Shift out `write`, then shift in `read.len()` bytes, in a single
    /// chip-select frame.
    ///
    /// # Errors
    /// * [`CounterError::InvalidBuffer`] if either buffer is `None`; the bus
    ///   is not touched.
    /// * [`CounterError::Bus`] / [`CounterError::ChipSelect`] on hardware
    ///   failure.
    pub fn generic_transfer(
        &mut self,
        write: Option<&[u8]>,
        read: Option<&mut [u8]>,
    ) -> Result<(), Error<BUS, CS>> {
        self.driver.transfer(write, read)
    }

    // -----------------------------------------------------------------------
    // Mode registers
    // -----------------------------------------------------------------------

    /// Write a raw settings byte to MDR0 (quadrature mode, count type, index,
    /// filter).
    ///
    /// # Errors
    /// * [`CounterError::Bus`] / [`CounterError::ChipSelect`] on hardware
    ///   failure.
    pub fn write_mode0(&mut self, settings: u8) -> Result<(), Error<BUS, CS>> {
        self.driver.write_data(CMD_WR | REG_MDR0, &[settings])
    }

    /// Write a raw settings byte to MDR1 (width, enable, flags).
    ///
    /// Unlike [`configure`](Self::configure) this does not change the width
    /// the driver uses for multi-byte transfers.
    pub fn write_mode1(&mut self, settings: u8) -> Result<(), Error<BUS, CS>> {
        self.driver.write_data(CMD_WR | REG_MDR1, &[settings])
    }

    /// Read back MDR0.
    pub fn read_mode0(&mut self) -> Result<u8, Error<BUS, CS>> {
        self.driver.read_register(CMD_RD | REG_MDR0)
    }

    /// Read back MDR1.
    pub fn read_mode1(&mut self) -> Result<u8, Error<BUS, CS>> {
        self.driver.read_register(CMD_RD | REG_MDR1)
    }

    /// Writes the byte `CLR|MDR0` (0x08) into MDR0.
    ///
    /// This is a data write, not the bare clear instruction used by
    /// [`clear_counter`](Self::clear_counter). The resulting MDR0 selects
    /// range-limit counting rather than zero.
    pub fn clear_mode0(&mut self) -> Result<(), Error<BUS, CS>> {
        self.write_mode0(CMD_CLR | REG_MDR0)
    }

    /// Writes the byte `CLR|MDR1` (0x10) into MDR1; see
    /// [`clear_mode0`](Self::clear_mode0).
    pub fn clear_mode1(&mut self) -> Result<(), Error<BUS, CS>> {
        self.write_mode1(CMD_CLR | REG_MDR1)
    }

    // -----------------------------------------------------------------------
    // Data, counter and output registers
    // -----------------------------------------------------------------------

    /// Write the first `register_width` bytes of `bytes` to DTR,
    /// most-significant first.
    pub fn write_data_register(&mut self, bytes: &[u8; 4]) -> Result<(), Error<BUS, CS>> {
        let len = self.payload_len();
        self.driver.write_data(CMD_WR | REG_DTR, &bytes[..len])
    }

    /// Write the low `register_width` bytes of `value` to DTR.
    pub fn write_data_value(&mut self, value: u32) -> Result<(), Error<BUS, CS>> {
        let bytes = match self.width {
            Some(width) => disassemble_be(value, width),
            None => [0u8; 4],
        };
        self.write_data_register(&bytes)
    }

    /// Copy DTR into CNTR.
    pub fn load_counter_from_data(&mut self) -> Result<(), Error<BUS, CS>> {
        self.driver.write_command(CMD_LOAD | REG_CNTR)
    }

    /// Latch CNTR into OTR.
    pub fn load_output_from_counter(&mut self) -> Result<(), Error<BUS, CS>> {
        self.driver.write_command(CMD_LOAD | REG_OTR)
    }

    /// Preset the counter: write `value` to DTR, then load it into CNTR.
    pub fn set_counter(&mut self, value: u32) -> Result<(), Error<BUS, CS>> {
        self.write_data_value(value)?;
        self.load_counter_from_data()
    }

    /// Read the live counter.
    ///
    /// Exactly `register_width` bytes are clocked in and assembled
    /// most-significant first; narrower widths are zero-extended. Reading
    /// CNTR directly while the encoder moves can tear; prefer
    /// [`snapshot`](Self::snapshot) for a consistent value.
    ///
    /// # Errors
    /// * [`CounterError::Bus`] / [`CounterError::ChipSelect`] on hardware
    ///   failure.
    ///
    /// # Example
    /// ```no_run
    /// # fn example<B: ls7366r_counter::CounterBus, P: embedded_hal::digital::OutputPin>(
    /// #     counter: &mut ls7366r_counter::Ls7366r<B, P>) {
    /// let ticks = counter.read_counter().unwrap();
    /// # }
    /// ```
    pub fn read_counter(&mut self) -> Result<u32, Error<BUS, CS>> {
        self.read_wide(CMD_RD | REG_CNTR)
    }

    /// Read DTR, reinterpreting the assembled bits as `i32`.
    pub fn read_data_register(&mut self) -> Result<i32, Error<BUS, CS>> {
        self.read_wide(CMD_RD | REG_DTR).map(|v| v as i32)
    }

    /// Read OTR, reinterpreting the assembled bits as `i32`.
    ///
    /// OTR only changes on [`load_output_from_counter`](Self::load_output_from_counter)
    /// or an index event configured to latch it.
    pub fn read_output_register(&mut self) -> Result<i32, Error<BUS, CS>> {
        self.read_wide(CMD_RD | REG_OTR).map(|v| v as i32)
    }

    /// Latch the live count into OTR and read it back without disturbing
    /// counting.
    pub fn snapshot(&mut self) -> Result<i32, Error<BUS, CS>> {
        self.load_output_from_counter()?;
        self.read_output_register()
    }

    /// Zero CNTR.
    pub fn clear_counter(&mut self) -> Result<(), Error<BUS, CS>> {
        self.driver.write_command(CMD_CLR | REG_CNTR)
    }

    // -----------------------------------------------------------------------
    // Status register
    // -----------------------------------------------------------------------

    /// Read the raw STR byte.
    ///
    /// # Errors
    /// * [`CounterError::Bus`] / [`CounterError::ChipSelect`] on hardware
    ///   failure.
    pub fn read_status(&mut self) -> Result<u8, Error<BUS, CS>> {
        self.driver.read_register(CMD_RD | REG_STR)
    }

    /// Read STR and decode it; see [`Status`].
    pub fn read_status_flags(&mut self) -> Result<Status, Error<BUS, CS>> {
        self.read_status().map(Status::from_bits)
    }

    /// Reset the latched status bits (CEN and U/D are unaffected).
    pub fn clear_status(&mut self) -> Result<(), Error<BUS, CS>> {
        self.driver.write_command(CMD_CLR | REG_STR)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn payload_len(&self) -> usize {
        if self.width.is_none() {
            #[cfg(feature = "defmt")]
            defmt::warn!("LS7366R register access before configure(); no payload sent");
        }
        payload_len(self.width)
    }

    fn read_wide(&mut self, command: u8) -> Result<u32, Error<BUS, CS>> {
        let len = self.payload_len();
        let mut buf = [0u8; 4];
        self.driver.read_data(command, &mut buf[..len])?;
        Ok(assemble_be(&buf[..len]))
    }
}
