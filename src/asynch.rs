//! Async variant of the driver for Embassy-style firmware.
//!
//! [`Ls7366rAsync`] issues exactly the same byte sequences as
//! [`Ls7366r`](crate::Ls7366r); only the byte transfers await. The chip
//! select is released on every exit path by pairing each
//! [`select`](Ls7366rAsync::select) with a [`deselect`](Ls7366rAsync::deselect)
//! that runs even when the body failed.

use core::fmt;

use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_async::spi::SpiBus;

use crate::bus::SpiSettings;
use crate::error::CounterError;
use crate::registers::*;
use crate::status::Status;
use crate::width::{assemble_be, disassemble_be, payload_len, RegisterWidth};

/// Async counterpart of [`CounterBus`](crate::CounterBus).
#[allow(async_fn_in_trait)]
pub trait AsyncCounterBus {
    type Error: fmt::Debug;

    /// Claim the bus.
    async fn begin(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Release the bus.
    async fn end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply `settings` for the transaction that follows.
    async fn begin_transaction(&mut self, _settings: &SpiSettings) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Finish the current transaction; all bytes must be on the wire.
    async fn end_transaction(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Send one byte and return the byte clocked in at the same time.
    async fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error>;
}

/// [`AsyncCounterBus`] adapter for any `embedded-hal-async` [`SpiBus`].
///
/// As with [`HalBus`](crate::HalBus), the peripheral must already be
/// running with the driver's [`SpiSettings`].
pub struct AsyncHalBus<SPI> {
    spi: SPI,
}

impl<SPI> AsyncHalBus<SPI> {
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI bus.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> AsyncCounterBus for AsyncHalBus<SPI>
where
    SPI: SpiBus<u8>,
{
    type Error = SPI::Error;

    async fn end(&mut self) -> Result<(), Self::Error> {
        self.spi.flush().await
    }

    async fn end_transaction(&mut self) -> Result<(), Self::Error> {
        self.spi.flush().await
    }

    async fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut buf = [byte];
        self.spi.transfer_in_place(&mut buf).await?;
        Ok(buf[0])
    }
}

pub type AsyncError<BUS, CS> =
    CounterError<<BUS as AsyncCounterBus>::Error, <CS as ErrorType>::Error>;

/// Async LS7366R driver.
///
/// # Example
///
/// ```no_run
/// use ls7366r_counter::asynch::{AsyncHalBus, Ls7366rAsync};
///
/// # async fn example<SPI, CS>(spi: SPI, cs: CS)
/// # where SPI: embedded_hal_async::spi::SpiBus, CS: embedded_hal::digital::OutputPin {
/// let mut counter = Ls7366rAsync::new(AsyncHalBus::new(spi), cs);
/// counter.begin().await.unwrap();
/// counter.default_configuration().await.unwrap();
/// let position = counter.read_counter().await.unwrap();
/// # }
/// ```
pub struct Ls7366rAsync<BUS, CS> {
    bus: BUS,
    cs: CS,
    settings: SpiSettings,
    width: Option<RegisterWidth>,
}

impl<BUS, CS> Ls7366rAsync<BUS, CS>
where
    BUS: AsyncCounterBus,
    CS: OutputPin,
{
    /// Create a driver with the default settings (100 kHz, MSB first,
    /// mode 0). No bus traffic is generated.
    pub fn new(bus: BUS, cs: CS) -> Self {
        Self::with_settings(bus, cs, SpiSettings::default())
    }

    /// Create a driver that pushes `settings` at the start of every
    /// transaction.
    pub fn with_settings(bus: BUS, cs: CS, settings: SpiSettings) -> Self {
        Self {
            bus,
            cs,
            settings,
            width: None,
        }
    }

    /// Bus settings pushed at the start of every transaction.
    pub fn settings(&self) -> &SpiSettings {
        &self.settings
    }

    /// Width used for DTR, CNTR and OTR transfers; `None` until
    /// [`configure`](Self::configure) has run.
    pub fn register_width(&self) -> Option<RegisterWidth> {
        self.width
    }

    /// Hand back the bus and chip-select pin.
    pub fn release(self) -> (BUS, CS) {
        (self.bus, self.cs)
    }

    // -----------------------------------------------------------------------
    // Framing
    // -----------------------------------------------------------------------

    async fn select(&mut self) -> Result<(), AsyncError<BUS, CS>> {
        self.cs.set_low().map_err(CounterError::ChipSelect)?;
        if let Err(e) = self.bus.begin_transaction(&self.settings).await {
            let _ = self.cs.set_high();
            return Err(CounterError::Bus(e));
        }
        Ok(())
    }

    async fn deselect(&mut self) -> Result<(), AsyncError<BUS, CS>> {
        let ended = self.bus.end_transaction().await.map_err(CounterError::Bus);
        let deselected = self.cs.set_high().map_err(CounterError::ChipSelect);
        ended.and(deselected)
    }

    async fn shift(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), AsyncError<BUS, CS>> {
        for &byte in write {
            self.bus.transfer_byte(byte).await.map_err(CounterError::Bus)?;
        }
        for slot in read.iter_mut() {
            *slot = self.bus.transfer_byte(0x00).await.map_err(CounterError::Bus)?;
        }
        Ok(())
    }

    /// Run one framed transaction; the chip is deselected even if the
    /// shift fails, and the shift error takes precedence.
    async fn framed(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), AsyncError<BUS, CS>> {
        self.select().await?;
        let shifted = self.shift(write, read).await;
        let released = self.deselect().await;
        shifted.and(released)
    }

    // -----------------------------------------------------------------------
    // Primitives
    // -----------------------------------------------------------------------

    /// Shift out `write`, then shift in `read.len()` bytes, in a single
    /// chip-select frame.
    ///
    /// # Errors
    /// * [`CounterError::InvalidBuffer`] if either buffer is `None`; the bus
    ///   is not touched.
    /// * [`CounterError::Bus`] / [`CounterError::ChipSelect`] on hardware
    ///   failure.
    pub async fn generic_transfer(
        &mut self,
        write: Option<&[u8]>,
        read: Option<&mut [u8]>,
    ) -> Result<(), AsyncError<BUS, CS>> {
        let (Some(write), Some(read)) = (write, read) else {
            return Err(CounterError::InvalidBuffer);
        };
        read.fill(0);
        self.framed(write, read).await
    }

    async fn write_command(&mut self, command: u8) -> Result<(), AsyncError<BUS, CS>> {
        self.framed(&[command], &mut []).await
    }

    async fn write_data(&mut self, command: u8, data: &[u8]) -> Result<(), AsyncError<BUS, CS>> {
        let mut frame = [0u8; 5];
        frame[0] = command;
        frame[1..=data.len()].copy_from_slice(data);
        self.framed(&frame[..=data.len()], &mut []).await
    }

    async fn read_register(&mut self, command: u8) -> Result<u8, AsyncError<BUS, CS>> {
        let mut rx = [0u8; 1];
        self.framed(&[command], &mut rx).await?;
        Ok(rx[0])
    }

    fn payload_len(&self) -> usize {
        if self.width.is_none() {
            #[cfg(feature = "defmt")]
            defmt::warn!("LS7366R register access before configure(); no payload sent");
        }
        payload_len(self.width)
    }

    async fn read_wide(&mut self, command: u8) -> Result<u32, AsyncError<BUS, CS>> {
        let len = self.payload_len();
        let mut buf = [0u8; 4];
        self.framed(&[command], &mut buf[..len]).await?;
        Ok(assemble_be(&buf[..len]))
    }

    // -----------------------------------------------------------------------
    // Lifecycle and configuration
    // -----------------------------------------------------------------------

    /// Claim the bus and deselect the chip.
    pub async fn begin(&mut self) -> Result<(), AsyncError<BUS, CS>> {
        self.bus.begin().await.map_err(CounterError::Bus)?;
        self.cs.set_high().map_err(CounterError::ChipSelect)
    }

    /// Clear the counter, stop counting and release the bus.
    ///
    /// # Errors
    /// * [`CounterError::Bus`] / [`CounterError::ChipSelect`] on hardware
    ///   failure.
    pub async fn end(&mut self) -> Result<(), AsyncError<BUS, CS>> {
        self.clear_counter().await?;
        self.disable().await?;
        let ended = self.bus.end().await.map_err(CounterError::Bus);
        let deselected = self.cs.set_high().map_err(CounterError::ChipSelect);
        ended.and(deselected)
    }

    /// Bring the chip into a known state: 4× quadrature, free-running,
    /// 32-bit registers, counter zeroed and counting enabled.
    pub async fn default_configuration(&mut self) -> Result<(), AsyncError<BUS, CS>> {
        self.configure(DEFAULT_MDR0, DEFAULT_MDR1).await?;
        self.write_data_register(&[0u8; 4]).await?;
        self.clear_counter().await?;
        self.load_counter_from_data().await?;
        self.enable().await
    }

    /// Write MDR0 then MDR1 and adopt the register width encoded in MDR1.
    ///
    /// Must run before any DTR, CNTR or OTR transfer.
    ///
    /// # Errors
    /// * [`CounterError::Bus`] / [`CounterError::ChipSelect`] on hardware
    ///   failure.
    pub async fn configure(&mut self, mdr0: u8, mdr1: u8) -> Result<(), AsyncError<BUS, CS>> {
        self.write_mode0(mdr0).await?;
        self.write_mode1(mdr1).await?;

        let width = RegisterWidth::from_mdr1(mdr1);
        self.width = Some(width);

        #[cfg(feature = "defmt")]
        defmt::debug!("LS7366R configured: mdr0={=u8:#x} mdr1={=u8:#x} width={}", mdr0, mdr1, width);

        Ok(())
    }

    /// Resume counting. Other MDR1 bits are preserved.
    pub async fn enable(&mut self) -> Result<(), AsyncError<BUS, CS>> {
        let mdr1 = self.read_mode1().await? & !MDR1_DISABLE;
        self.write_mode1(mdr1).await
    }

    /// Halt counting. Other MDR1 bits are preserved.
    pub async fn disable(&mut self) -> Result<(), AsyncError<BUS, CS>> {
        let mdr1 = self.read_mode1().await? | MDR1_DISABLE;
        self.write_mode1(mdr1).await
    }

    // -----------------------------------------------------------------------
    // Registers
    // -----------------------------------------------------------------------

    /// Write a raw settings byte to MDR0.
    ///
    /// # Errors
    /// * [`CounterError::Bus`] / [`CounterError::ChipSelect`] on hardware
    ///   failure.
    pub async fn write_mode0(&mut self, settings: u8) -> Result<(), AsyncError<BUS, CS>> {
        self.write_data(CMD_WR | REG_MDR0, &[settings]).await
    }

    /// Write a raw settings byte to MDR1; the stored width is unchanged.
    pub async fn write_mode1(&mut self, settings: u8) -> Result<(), AsyncError<BUS, CS>> {
        self.write_data(CMD_WR | REG_MDR1, &[settings]).await
    }

    /// Read back MDR0.
    pub async fn read_mode0(&mut self) -> Result<u8, AsyncError<BUS, CS>> {
        self.read_register(CMD_RD | REG_MDR0).await
    }

    /// Read back MDR1.
    pub async fn read_mode1(&mut self) -> Result<u8, AsyncError<BUS, CS>> {
        self.read_register(CMD_RD | REG_MDR1).await
    }

    /// Writes the byte `CLR|MDR0` (0x08) into MDR0 as data, like
    /// [`Ls7366r::clear_mode0`](crate::Ls7366r::clear_mode0).
    pub async fn clear_mode0(&mut self) -> Result<(), AsyncError<BUS, CS>> {
        self.write_mode0(CMD_CLR | REG_MDR0).await
    }

    /// Writes the byte `CLR|MDR1` (0x10) into MDR1 as data.
    pub async fn clear_mode1(&mut self) -> Result<(), AsyncError<BUS, CS>> {
        self.write_mode1(CMD_CLR | REG_MDR1).await
    }

    /// Write the first `register_width` bytes of `bytes` to DTR,
    /// most-significant first.
    pub async fn write_data_register(&mut self, bytes: &[u8; 4]) -> Result<(), AsyncError<BUS, CS>> {
        let len = self.payload_len();
        self.write_data(CMD_WR | REG_DTR, &bytes[..len]).await
    }

    /// Write the low `register_width` bytes of `value` to DTR.
    pub async fn write_data_value(&mut self, value: u32) -> Result<(), AsyncError<BUS, CS>> {
        let bytes = match self.width {
            Some(width) => disassemble_be(value, width),
            None => [0u8; 4],
        };
        self.write_data_register(&bytes).await
    }

    /// Copy DTR into CNTR.
    pub async fn load_counter_from_data(&mut self) -> Result<(), AsyncError<BUS, CS>> {
        self.write_command(CMD_LOAD | REG_CNTR).await
    }

    /// Latch CNTR into OTR.
    pub async fn load_output_from_counter(&mut self) -> Result<(), AsyncError<BUS, CS>> {
        self.write_command(CMD_LOAD | REG_OTR).await
    }

    /// Preset the counter: write `value` to DTR, then load it into CNTR.
    pub async fn set_counter(&mut self, value: u32) -> Result<(), AsyncError<BUS, CS>> {
        self.write_data_value(value).await?;
        self.load_counter_from_data().await
    }

    /// Read the live counter, zero-extended from `register_width` bytes.
    ///
    /// # Errors
    /// * [`CounterError::Bus`] / [`CounterError::ChipSelect`] on hardware
    ///   failure.
    pub async fn read_counter(&mut self) -> Result<u32, AsyncError<BUS, CS>> {
        self.read_wide(CMD_RD | REG_CNTR).await
    }

    /// Read DTR, reinterpreting the assembled bits as `i32`.
    pub async fn read_data_register(&mut self) -> Result<i32, AsyncError<BUS, CS>> {
        self.read_wide(CMD_RD | REG_DTR).await.map(|v| v as i32)
    }

    /// Read OTR, reinterpreting the assembled bits as `i32`.
    pub async fn read_output_register(&mut self) -> Result<i32, AsyncError<BUS, CS>> {
        self.read_wide(CMD_RD | REG_OTR).await.map(|v| v as i32)
    }

    /// Latch the live count into OTR and read it back.
    pub async fn snapshot(&mut self) -> Result<i32, AsyncError<BUS, CS>> {
        self.load_output_from_counter().await?;
        self.read_output_register().await
    }

    /// Zero CNTR.
    pub async fn clear_counter(&mut self) -> Result<(), AsyncError<BUS, CS>> {
        self.write_command(CMD_CLR | REG_CNTR).await
    }

    /// Read the raw STR byte.
    pub async fn read_status(&mut self) -> Result<u8, AsyncError<BUS, CS>> {
        self.read_register(CMD_RD | REG_STR).await
    }

    /// Read STR and decode it; see [`Status`].
    pub async fn read_status_flags(&mut self) -> Result<Status, AsyncError<BUS, CS>> {
        self.read_status().await.map(Status::from_bits)
    }

    /// Reset the latched status bits (CEN and U/D are unaffected).
    pub async fn clear_status(&mut self) -> Result<(), AsyncError<BUS, CS>> {
        self.write_command(CMD_CLR | REG_STR).await
    }
}
