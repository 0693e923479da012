// CTRL_SEND is the control byte that precedes a command frame written to the chip.
pub const CTRL_SEND: u8 = 0x00;

// CTRL_READ is the control byte that clocks the pending response frame out of the chip.
pub const CTRL_READ: u8 = 0x02;

// CTRL_POLL is the control byte that reads the chip's status register.
pub const CTRL_POLL: u8 = 0x03;

// READY_FLAG is bit 3 of the status register, set once a response can be read.
pub const READY_FLAG: u8 = 0x08;

// ECHO_SENTINEL is the byte the chip sends back when it answers an ECHO command.
pub const ECHO_SENTINEL: u8 = 0x55;

// TAG_OK is the SendRecv result code reported when a tag answered the exchange.
pub const TAG_OK: u8 = 0x80;

// MAX_PAYLOAD_LEN is the largest payload a one-byte length field can describe.
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

// MAX_UID_HEX_LEN is the longest hexadecimal tag identifier a response can yield.
pub const MAX_UID_HEX_LEN: usize = 2 * MAX_PAYLOAD_LEN;

// UID_TRAILER_LEN is the number of check bytes following the UID in an anticollision reply.
pub const UID_TRAILER_LEN: usize = 3;

// ISO14443A_PROTOCOL selects ISO/IEC 14443-A in the ProtocolSelect payload.
pub const ISO14443A_PROTOCOL: u8 = 0x02;

// REQA asks every ISO/IEC 14443-A tag in the field to answer; 0x07 sends 7 significant bits.
pub const REQA: [u8; 2] = [0x26, 0x07];

// ANTICOLLISION runs cascade level 1 anticollision; 0x08 sends 8 significant bits.
pub const ANTICOLLISION: [u8; 3] = [0x93, 0x20, 0x08];

// MODULATION_GAIN writes the modulation index and receiver gain register.
pub const MODULATION_GAIN: [u8; 6] = [0x09, 0x04, 0x68, 0x01, 0x01, 0x50];

// AUTO_FDET enables automatic frequency detection.
pub const AUTO_FDET: [u8; 6] = [0x09, 0x04, 0x0A, 0x01, 0x02, 0xA1];
