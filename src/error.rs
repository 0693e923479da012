#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The SPI bus reported a transfer failure.
    BusFailure,
    /// A chip-select, wake or indicator line could not be driven.
    PinFailure,
    /// The chip never raised its ready flag within the configured poll attempts.
    Timeout,
    /// A command payload does not fit the one-byte length field.
    PayloadTooLong,
    /// A response's length byte disagrees with the payload it carries.
    LengthMismatch,
    /// The chip never answered the ECHO handshake within the configured attempts.
    DeviceNotFound,
    /// The chip answered with a non-zero result code.
    CommandFailed(u8),
    /// A reply is too short or malformed for the command that produced it.
    InvalidResponse,
    /// The serial text stream rejected a write.
    WriteFailure,
}
