use heapless::Vec;

use crate::{Error, MAX_PAYLOAD_LEN};

/// Command identifiers understood by the CR95HF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Reads the device name and ROM CRC.
    Idn = 0x01,
    /// Selects the RF communication protocol.
    ProtocolSelect = 0x02,
    /// Sends data to a tag and returns its reply.
    SendRecv = 0x04,
    /// Switches to a low power state, also used to run tag detection calibration.
    Idle = 0x07,
    /// Reads an analog configuration register.
    RdReg = 0x08,
    /// Writes an analog configuration register.
    WrReg = 0x09,
    /// Changes the UART baud rate.
    BaudRate = 0x0A,
    /// Asks the chip to send back the ECHO byte.
    Echo = 0x55,
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> u8 {
        opcode as u8
    }
}

/// An encoded command frame: opcode, length byte, then the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8, { MAX_PAYLOAD_LEN + 2 }>,
}

impl Frame {
    /// Encodes `payload` under `opcode`.
    ///
    /// A zero-length payload is legal; the frame then ends right after its length byte.
    ///
    /// # Returns
    ///
    /// * `Ok(Frame)` holding `[opcode, len, payload...]`.
    /// * `Err(Error::PayloadTooLong)` if `payload` does not fit the length byte.
    pub fn encode(opcode: Opcode, payload: &[u8]) -> Result<Frame, Error> {
        let len = u8::try_from(payload.len()).map_err(|_| {
            log::error!(
                "Payload of {} bytes does not fit a {:?} frame",
                payload.len(),
                opcode
            );
            Error::PayloadTooLong
        })?;

        let mut bytes = Vec::new();
        // Capacity is MAX_PAYLOAD_LEN + 2 and len fits in a u8, so none of these can fail.
        bytes.push(opcode.into()).map_err(|_| Error::PayloadTooLong)?;
        bytes.push(len).map_err(|_| Error::PayloadTooLong)?;
        bytes
            .extend_from_slice(payload)
            .map_err(|_| Error::PayloadTooLong)?;

        Ok(Frame { bytes })
    }

    /// The opcode byte.
    pub fn opcode(&self) -> u8 {
        self.bytes[0]
    }

    /// The length byte, equal to the payload length.
    pub fn len(&self) -> u8 {
        self.bytes[1]
    }

    /// True when the frame carries no payload.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The payload following the length byte.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[2..]
    }

    /// The frame as it goes on the wire after the send control byte.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A response frame read back from the chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Result code; `0x00` for success on most commands, `0x80` for a tag reply.
    pub status: u8,
    data: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl Response {
    /// Number of payload bytes, as announced by the length byte.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the response carries no payload.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The response payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Decodes a response from its raw status, length and payload bytes.
///
/// The only check made is that `payload` holds exactly `length` bytes; the
/// chip does not checksum its replies, so the content is taken at face value.
pub fn decode(status: u8, length: u8, payload: &[u8]) -> Result<Response, Error> {
    if payload.len() != usize::from(length) {
        log::error!(
            "Response announces {} bytes but carries {}: {:02X?}",
            length,
            payload.len(),
            payload
        );
        return Err(Error::LengthMismatch);
    }

    let data = Vec::from_slice(payload).map_err(|_| Error::LengthMismatch)?;
    Ok(Response { status, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reverses_encode() {
        let opcodes = [
            Opcode::Idn,
            Opcode::ProtocolSelect,
            Opcode::SendRecv,
            Opcode::Idle,
            Opcode::RdReg,
            Opcode::WrReg,
            Opcode::BaudRate,
            Opcode::Echo,
        ];
        let payloads: [&[u8]; 3] = [&[], &[0x02, 0x00], &[0xA5; 17]];

        for opcode in opcodes {
            for payload in payloads {
                let frame = Frame::encode(opcode, payload).unwrap();
                let response = decode(frame.opcode(), frame.len(), frame.payload()).unwrap();

                assert_eq!(response.status, u8::from(opcode));
                assert_eq!(response.len(), payload.len());
                assert_eq!(response.data(), payload);
            }
        }
    }

    #[test]
    fn empty_payload_ends_after_length() {
        let frame = Frame::encode(Opcode::Idn, &[]).unwrap();
        assert_eq!(frame.as_bytes(), &[0x01, 0x00]);
        assert!(frame.is_empty());
    }

    #[test]
    fn payload_longer_than_length_field_is_rejected() {
        let payload = [0u8; MAX_PAYLOAD_LEN + 1];
        assert_eq!(
            Frame::encode(Opcode::SendRecv, &payload),
            Err(Error::PayloadTooLong)
        );

        let payload = [0u8; MAX_PAYLOAD_LEN];
        assert_eq!(
            Frame::encode(Opcode::SendRecv, &payload).unwrap().len(),
            u8::MAX
        );
    }

    #[test]
    fn decode_rejects_length_mismatch() {
        assert_eq!(decode(0x00, 3, &[0x01, 0x02]), Err(Error::LengthMismatch));
    }
}
