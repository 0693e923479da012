#![cfg_attr(not(test), no_std)]

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_async::{delay::DelayNs, spi::SpiBus};
use heapless::String;
use log::debug;

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

mod frame;
pub use frame::*;

mod calibration;
pub use calibration::*;

mod tag;
pub use tag::*;

mod reporter;
pub use reporter::*;

mod bus;
use bus::Bus;

/// Length of the device name reported by the IDN command, terminator excluded.
pub const DEVICE_NAME_LEN: usize = 16;

/// Identification data returned by the IDN command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device name, e.g. `NFC FS2JAST4`.
    pub name: String<DEVICE_NAME_LEN>,
    /// CRC of the chip's ROM.
    pub rom_crc: u16,
}

/// Output pin for boards without a tag-present indicator.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIndicator;

impl ErrorType for NoIndicator {
    type Error = Infallible;
}

impl OutputPin for NoIndicator {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Represents a CR95HF contactless transceiver wired over SPI.
///
/// This struct provides methods to wake and calibrate the chip, select
/// ISO/IEC 14443-A and read the UID of tags brought into the field.
///
/// # Type Parameters
///
/// * `SPI`: The SPI bus connected to the chip, implementing `embedded_hal_async::spi::SpiBus`.
/// * `CS`: The chip-select line, active low.
/// * `WAKE`: The IRQ_IN line used to wake the chip.
/// * `IND`: An indicator set while a tag is being read, see [`NoIndicator`].
/// * `D`: A delay provider implementing `embedded_hal_async::delay::DelayNs`.
pub struct Cr95hf<SPI, CS, WAKE, IND, D> {
    bus: Bus<SPI, CS>,
    wake: WAKE,
    indicator: IND,
    delay: D,
    config: Config,
    holdoff: bool,
}

impl<SPI, CS, WAKE, IND, D> Cr95hf<SPI, CS, WAKE, IND, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    WAKE: OutputPin,
    IND: OutputPin,
    D: DelayNs,
{
    /// Creates a new `Cr95hf` driver instance.
    ///
    /// # Arguments
    ///
    /// * `spi`: The SPI bus, already configured for the chip (mode 0, at most 2 MHz).
    /// * `cs`: The chip-select pin; it should idle high.
    /// * `wake`: The IRQ_IN pin; it should idle high.
    /// * `indicator`: The tag-present indicator.
    /// * `delay`: The delay provider.
    /// * `config`: Timing and retry settings.
    pub fn new(spi: SPI, cs: CS, wake: WAKE, indicator: IND, delay: D, config: Config) -> Self {
        Self {
            bus: Bus::new(spi, cs),
            wake,
            indicator,
            delay,
            config,
            holdoff: false,
        }
    }

    /// Gives back the bus and pins.
    pub fn release(self) -> (SPI, CS, WAKE, IND, D) {
        let (spi, cs) = self.bus.release();
        (spi, cs, self.wake, self.indicator, self.delay)
    }

    /// Brings the chip up for tag reading.
    ///
    /// This involves:
    /// - Waiting for the chip to answer the ECHO handshake, waking it between attempts.
    /// - Running the tag detection calibration sweep.
    /// - Writing the modulation/gain and auto frequency detection registers.
    /// - Selecting ISO/IEC 14443-A.
    pub async fn init(&mut self) -> Result<(), Error> {
        self.wait_for_device().await?;

        debug!("CR95HF detected, calibrating");
        self.calibrate().await.map_err(|e| {
            log::error!("Calibration failed during init: {:?}", e);
            e
        })?;

        self.configure_registers().await.map_err(|e| {
            log::error!("Register configuration failed during init: {:?}", e);
            e
        })?;

        self.select_iso14443a().await.map_err(|e| {
            log::error!("Failed to select ISO/IEC 14443-A during init: {:?}", e);
            e
        })?;

        debug!("CR95HF init sequence complete.");
        Ok(())
    }

    /// Sends a command and waits for its response.
    ///
    /// The status register is polled every `poll_interval_ms` until the chip
    /// flags a response as ready, which is then read in full.
    ///
    /// # Returns
    ///
    /// * `Ok(Response)` with the chip's result code and payload.
    /// * `Err(Error::Timeout)` if the ready flag is not seen within `max_poll_attempts` polls.
    /// * `Err(Error::PayloadTooLong)` if `payload` does not fit a frame.
    /// * `Err(Error::BusFailure)` or `Err(Error::PinFailure)` for bus issues.
    pub async fn send_and_await(
        &mut self,
        opcode: Opcode,
        payload: &[u8],
    ) -> Result<Response, Error> {
        let frame = Frame::encode(opcode, payload)?;
        self.bus.send_frame(&frame).await?;
        self.wait_ready().await?;
        self.bus.read_response().await
    }

    // Polls the status register until the ready flag shows up.
    // The status register is always read at least once.
    async fn wait_ready(&mut self) -> Result<(), Error> {
        let max_attempts = self.config.max_poll_attempts.max(1);

        for attempt in 1..=max_attempts {
            let status = self.bus.status().await?;
            if status & READY_FLAG != 0 {
                return Ok(());
            }
            if attempt < max_attempts {
                self.delay.delay_ms(self.config.poll_interval_ms).await;
            }
        }

        log::warn!("Response not ready after {} polls", max_attempts);
        Err(Error::Timeout)
    }

    /// Checks that the chip is alive with the ECHO command.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the chip answered with the ECHO byte.
    /// * `Ok(false)` if it answered anything else or never became ready.
    /// * `Err(Error)` if the bus or chip select failed.
    pub async fn probe(&mut self) -> Result<bool, Error> {
        // ECHO is a bare opcode, it takes no length byte.
        self.bus.send(&[Opcode::Echo.into()]).await?;

        match self.wait_ready().await {
            Ok(()) => {}
            Err(Error::Timeout) => return Ok(false),
            Err(e) => return Err(e),
        }

        let reply = self.bus.read_byte().await?;
        debug!("ECHO reply: {:02X}", reply);
        Ok(reply == ECHO_SENTINEL)
    }

    /// Repeats the ECHO handshake until the chip answers.
    ///
    /// After each failed attempt the wake line is pulsed low then high. With
    /// the default config this never gives up.
    ///
    /// # Returns
    ///
    /// * `Ok(())` once the chip answered.
    /// * `Err(Error::DeviceNotFound)` if `probe_attempts` ran out.
    pub async fn wait_for_device(&mut self) -> Result<(), Error> {
        let mut failures: u32 = 0;

        while !self.probe().await? {
            failures = failures.saturating_add(1);
            debug!(
                "No ECHO from CR95HF (attempt {}), pulsing wake line",
                failures
            );
            self.pulse_wake().await?;

            if let Some(max) = self.config.probe_attempts {
                if failures >= max {
                    log::error!("CR95HF did not answer after {} attempts", failures);
                    return Err(Error::DeviceNotFound);
                }
            }
        }

        Ok(())
    }

    async fn pulse_wake(&mut self) -> Result<(), Error> {
        self.wake.set_low().map_err(|_| Error::PinFailure)?;
        self.delay.delay_ms(self.config.wake_pulse_ms).await;
        self.wake.set_high().map_err(|_| Error::PinFailure)?;
        self.delay.delay_ms(self.config.wake_pulse_ms).await;
        Ok(())
    }

    /// Reads the device name and ROM CRC.
    ///
    /// # Returns
    ///
    /// * `Ok(DeviceInfo)` on success.
    /// * `Err(Error::CommandFailed)` if the chip returned a non-zero result code.
    /// * `Err(Error::InvalidResponse)` if the reply is too short to hold the CRC.
    pub async fn identify(&mut self) -> Result<DeviceInfo, Error> {
        debug!("Querying device identification (IDN)");
        let response = self.send_and_await(Opcode::Idn, &[]).await?;
        if response.status != 0x00 {
            log::error!("IDN failed with result code {:02X}", response.status);
            return Err(Error::CommandFailed(response.status));
        }

        let data = response.data();
        let split = data.len().checked_sub(2).ok_or_else(|| {
            log::error!("IDN reply too short: {:02X?}", data);
            Error::InvalidResponse
        })?;
        let (raw_name, crc) = data.split_at(split);

        let raw_name = raw_name.split(|&b| b == 0).next().unwrap_or_default();
        let name = core::str::from_utf8(raw_name).map_err(|_| Error::InvalidResponse)?;

        let info = DeviceInfo {
            name: String::try_from(name).map_err(|_| Error::InvalidResponse)?,
            rom_crc: u16::from_be_bytes([crc[0], crc[1]]),
        };
        debug!("Device: {} (ROM CRC {:04X})", info.name, info.rom_crc);
        Ok(info)
    }

    /// Runs the tag detection calibration with the fixed threshold sweep.
    pub async fn calibrate(&mut self) -> Result<(), Error> {
        self.calibrate_with(&mut FixedSweep::new()).await
    }

    /// Runs the tag detection calibration with values chosen by `strategy`.
    ///
    /// Each value is sent as an Idle command and its reply is fully read
    /// before the next one goes out; the chip rejects commands while a reply
    /// is still pending.
    pub async fn calibrate_with<C: Calibration>(
        &mut self,
        strategy: &mut C,
    ) -> Result<(), Error> {
        let mut previous: Option<Response> = None;

        while let Some(dac) = strategy.next_value(previous.as_ref()) {
            debug!("Calibration step, DAC threshold {:02X}", dac);
            let response = self
                .send_and_await(Opcode::Idle, &calibration_payload(dac))
                .await?;
            previous = Some(response);
        }

        Ok(())
    }

    /// Writes the modulation index/gain and auto frequency detection registers.
    pub async fn configure_registers(&mut self) -> Result<(), Error> {
        debug!("Configuring modulation index and gain");
        self.send_and_await(Opcode::WrReg, &MODULATION_GAIN).await?;
        debug!("Configuring auto frequency detection");
        self.send_and_await(Opcode::WrReg, &AUTO_FDET).await?;
        Ok(())
    }

    /// Selects ISO/IEC 14443-A as the RF protocol.
    pub async fn select_iso14443a(&mut self) -> Result<(), Error> {
        debug!("Selecting ISO/IEC 14443-A");
        let response = self
            .send_and_await(Opcode::ProtocolSelect, &[ISO14443A_PROTOCOL, 0x00])
            .await?;
        if response.status != 0x00 {
            log::warn!(
                "ProtocolSelect answered with result code {:02X}",
                response.status
            );
        }
        Ok(())
    }

    /// Looks for a tag in the field once.
    ///
    /// Sends REQA then a cascade level 1 anticollision. The indicator is set
    /// when a tag answered and cleared otherwise.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(TagId))` if a tag answered the anticollision. The identifier
    ///   is empty when the reply was too short to hold UID bytes.
    /// * `Ok(None)` if no tag is in the field.
    /// * `Err(Error)` if the chip could not be talked to.
    pub async fn try_read_tag(&mut self) -> Result<Option<TagId>, Error> {
        self.send_and_await(Opcode::SendRecv, &REQA).await?;
        let response = self.send_and_await(Opcode::SendRecv, &ANTICOLLISION).await?;

        let tag = if response.status == TAG_OK {
            let tag = TagId::from_anticollision(response.data())?;
            if tag.is_empty() {
                log::warn!(
                    "Anticollision reply too short for a UID: {:02X?}",
                    response.data()
                );
            }
            Some(tag)
        } else {
            None
        };

        match &tag {
            Some(tag) => {
                debug!("Tag in field: {}", tag);
                self.indicator.set_high().map_err(|_| Error::PinFailure)?;
            }
            None => {
                self.indicator.set_low().map_err(|_| Error::PinFailure)?;
            }
        }
        Ok(tag)
    }

    /// Polls the field until a tag shows up.
    ///
    /// Misses are spaced by `retry_pause_ms`. After a tag has been returned,
    /// the next call first waits `removal_pause_ms` so the same tag is not
    /// read again while it is taken away.
    pub async fn wait_for_tag(&mut self) -> Result<TagId, Error> {
        if self.holdoff {
            self.delay.delay_ms(self.config.removal_pause_ms).await;
            self.holdoff = false;
        }

        loop {
            if let Some(tag) = self.try_read_tag().await? {
                self.holdoff = true;
                return Ok(tag);
            }
            self.delay.delay_ms(self.config.retry_pause_ms).await;
        }
    }
}
