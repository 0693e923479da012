use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;
use log::debug;

use crate::{decode, Error, Frame, Response, CTRL_POLL, CTRL_READ, CTRL_SEND, MAX_PAYLOAD_LEN};

// Holds chip select low for as long as it lives.
struct Selected<'a, CS: OutputPin> {
    cs: &'a mut CS,
}

impl<'a, CS: OutputPin> Selected<'a, CS> {
    fn assert(cs: &'a mut CS) -> Result<Self, Error> {
        cs.set_low().map_err(|_| {
            log::error!("Failed to assert chip select");
            Error::PinFailure
        })?;
        Ok(Self { cs })
    }
}

impl<CS: OutputPin> Drop for Selected<'_, CS> {
    fn drop(&mut self) {
        if self.cs.set_high().is_err() {
            log::error!("Failed to release chip select");
        }
    }
}

/// SPI bus and chip-select line of one CR95HF.
///
/// Each method is a single transaction: chip select is asserted on entry and
/// released on every way out, errors included.
pub(crate) struct Bus<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> Bus<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    // Writes the send control byte followed by `bytes`.
    pub async fn send(&mut self, bytes: &[u8]) -> Result<(), Error> {
        debug!("Sending frame: {:02X?}", bytes);
        let _cs = Selected::assert(&mut self.cs)?;
        self.spi.write(&[CTRL_SEND]).await.map_err(bus_failure)?;
        self.spi.write(bytes).await.map_err(bus_failure)?;
        self.spi.flush().await.map_err(bus_failure)
    }

    pub async fn send_frame(&mut self, frame: &Frame) -> Result<(), Error> {
        self.send(frame.as_bytes()).await
    }

    // Reads the status register.
    pub async fn status(&mut self) -> Result<u8, Error> {
        let mut status = [0u8; 1];
        let _cs = Selected::assert(&mut self.cs)?;
        self.spi.write(&[CTRL_POLL]).await.map_err(bus_failure)?;
        self.spi.read(&mut status).await.map_err(bus_failure)?;
        self.spi.flush().await.map_err(bus_failure)?;
        Ok(status[0])
    }

    // Reads a full response frame: status, length, then exactly `length` bytes.
    pub async fn read_response(&mut self) -> Result<Response, Error> {
        let mut header = [0u8; 2];
        let mut payload = [0u8; MAX_PAYLOAD_LEN];

        let _cs = Selected::assert(&mut self.cs)?;
        self.spi.write(&[CTRL_READ]).await.map_err(bus_failure)?;
        self.spi.read(&mut header).await.map_err(bus_failure)?;
        let len = usize::from(header[1]);
        if len > 0 {
            self.spi
                .read(&mut payload[..len])
                .await
                .map_err(bus_failure)?;
        }
        self.spi.flush().await.map_err(bus_failure)?;

        debug!(
            "Received status {:02X}, {} bytes: {:02X?}",
            header[0],
            len,
            &payload[..len]
        );
        decode(header[0], header[1], &payload[..len])
    }

    // Reads the single byte the chip answers an ECHO with.
    pub async fn read_byte(&mut self) -> Result<u8, Error> {
        let mut byte = [0u8; 1];
        let _cs = Selected::assert(&mut self.cs)?;
        self.spi.write(&[CTRL_READ]).await.map_err(bus_failure)?;
        self.spi.read(&mut byte).await.map_err(bus_failure)?;
        self.spi.flush().await.map_err(bus_failure)?;
        Ok(byte[0])
    }
}

fn bus_failure<E: core::fmt::Debug>(e: E) -> Error {
    log::error!("SPI transfer failed: {:?}", e);
    Error::BusFailure
}
