use embedded_io_async::Write;

use crate::{Error, TagId};

/// Writes reader status lines and tag identifiers to a serial text stream.
///
/// Lines end with `\r\n`, a tag read is reported as `Tag ID:<HEX>`.
pub struct SerialReporter<W> {
    serial: W,
}

impl<W> SerialReporter<W>
where
    W: Write,
{
    pub fn new(serial: W) -> Self {
        Self { serial }
    }

    /// Writes `text` as a line of its own.
    pub async fn announce(&mut self, text: &str) -> Result<(), Error> {
        self.write_line(&[text.as_bytes()]).await
    }

    /// Writes the `Tag ID:` line for `tag`.
    pub async fn report_tag(&mut self, tag: &TagId) -> Result<(), Error> {
        self.write_line(&[b"Tag ID:", tag.as_str().as_bytes()]).await
    }

    pub fn into_inner(self) -> W {
        self.serial
    }

    async fn write_line(&mut self, parts: &[&[u8]]) -> Result<(), Error> {
        for part in parts {
            self.serial.write_all(part).await.map_err(write_failure)?;
        }
        self.serial.write_all(b"\r\n").await.map_err(write_failure)?;
        self.serial.flush().await.map_err(write_failure)
    }
}

fn write_failure<E: core::fmt::Debug>(e: E) -> Error {
    log::error!("Serial write failed: {:?}", e);
    Error::WriteFailure
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use embedded_io_async::ErrorType;

    #[derive(Default)]
    struct Sink {
        written: std::vec::Vec<u8>,
        flushes: usize,
    }

    impl ErrorType for Sink {
        type Error = Infallible;
    }

    impl Write for Sink {
        async fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        async fn flush(&mut self) -> Result<(), Infallible> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn writes_banner_and_tag_lines() {
        let mut reporter = SerialReporter::new(Sink::default());
        let tag = TagId::from_bytes(&[0xAB, 0xCD, 0xEF]).unwrap();

        block_on(reporter.announce("RFid Ready")).unwrap();
        block_on(reporter.report_tag(&tag)).unwrap();

        let sink = reporter.into_inner();
        assert_eq!(sink.written, b"RFid Ready\r\nTag ID:ABCDEF\r\n");
        assert_eq!(sink.flushes, 2);
    }
}
