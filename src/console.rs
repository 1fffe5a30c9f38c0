//! Console reporting over the platform log channel.

use core::fmt::{self, Write as _};

use embedded_io::{Error as _, ErrorKind, Write};
use heapless::String;

/// Size of the formatting buffer; no single console message may exceed it.
pub const OUT_BUF_SIZE: usize = 256;

/// Token bytes printed per hex dump line.
pub const BYTES_PER_LINE: usize = 16;

/// ANSI sequence that clears the screen and homes the cursor.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[;H";

/// Printed right before the token request.
pub const GENERATING: &str = "Generating attestation token\r\n";

/// Printed once the token is available, ahead of the hex dump.
pub const GENERATED: &str = "\nAttestation token generated:\r\n";

/// Console errors
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleError {
    /// Message does not fit the formatting buffer
    Overflow,

    /// The underlying writer failed
    Write(ErrorKind),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow => write!(f, "message exceeds {} bytes", OUT_BUF_SIZE),
            Self::Write(kind) => write!(f, "write error {:?}", kind),
        }
    }
}

/// Map the return value of the platform log service to an `embedded_io` write result.
///
/// The service returns either `PSA_SUCCESS` or a byte count on success and a negative PSA status on failure. Any
/// non-negative value counts as `len` bytes written.
pub fn platform_log_result(ret: i32, len: usize) -> Result<usize, ErrorKind> {
    if ret < 0 { Err(ErrorKind::Other) } else { Ok(len) }
}

/// Console that formats each message into a fixed buffer and hands it to the writer in one piece.
pub struct Console<W: Write> {
    writer: W,
    buf: String<OUT_BUF_SIZE>,
}

impl<W: Write> Console<W> {
    /// Create a console on top of `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buf: String::new(),
        }
    }

    /// Release the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Format `args` and emit them as one message.
    pub fn print(&mut self, args: fmt::Arguments<'_>) -> Result<(), ConsoleError> {
        self.buf.clear();
        self.buf.write_fmt(args).map_err(|_| ConsoleError::Overflow)?;
        self.flush_buf()
    }

    /// Clear the screen and print the framed `title`.
    pub fn banner(&mut self, title: &str) -> Result<(), ConsoleError> {
        self.print(format_args!("{}******* {} ******* \r\n\n", CLEAR_SCREEN, title))
    }

    /// Print `bytes` as `0x..` hex, [`BYTES_PER_LINE`] per line, each line terminated by CR LF.
    pub fn hex_dump(&mut self, bytes: &[u8]) -> Result<(), ConsoleError> {
        for line in bytes.chunks(BYTES_PER_LINE) {
            self.buf.clear();
            for b in line {
                write!(self.buf, "0x{:02x} ", b).map_err(|_| ConsoleError::Overflow)?;
            }
            self.buf.push_str("\r\n").map_err(|_| ConsoleError::Overflow)?;
            self.flush_buf()?;
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<(), ConsoleError> {
        self.writer
            .write_all(self.buf.as_bytes())
            .map_err(|e| ConsoleError::Write(e.kind()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sink {
        out: Vec<u8>,
        writes: Vec<usize>,
        fail: bool,
    }

    impl embedded_io::ErrorType for Sink {
        type Error = ErrorKind;
    }

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
            if self.fail {
                return Err(ErrorKind::BrokenPipe);
            }
            self.out.extend_from_slice(buf);
            self.writes.push(buf.len());
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), ErrorKind> {
            Ok(())
        }
    }

    #[test]
    fn test_banner() {
        let mut console = Console::new(Sink::default());
        console.banner("Hello").unwrap();
        let sink = console.into_inner();
        assert_eq!(sink.out, b"\x1b[2J\x1b[;H******* Hello ******* \r\n\n");
        assert_eq!(sink.writes.len(), 1);
    }

    #[test]
    fn test_hex_dump_full_and_partial_lines() {
        let bytes: Vec<u8> = (0u8..18).collect();
        let mut console = Console::new(Sink::default());
        console.hex_dump(&bytes).unwrap();
        let sink = console.into_inner();

        let expected = concat!(
            "0x00 0x01 0x02 0x03 0x04 0x05 0x06 0x07 0x08 0x09 0x0a 0x0b 0x0c 0x0d 0x0e 0x0f \r\n",
            "0x10 0x11 \r\n",
        );
        assert_eq!(sink.out, expected.as_bytes());
        assert_eq!(sink.writes, vec![16 * 5 + 2, 2 * 5 + 2usize]);
    }

    #[test]
    fn test_hex_dump_exact_multiple() {
        let bytes = [0xFFu8; 32];
        let mut console = Console::new(Sink::default());
        console.hex_dump(&bytes).unwrap();
        let sink = console.into_inner();
        assert_eq!(sink.writes.len(), 2);
        assert!(sink.out.ends_with(b"0xff \r\n"));
    }

    #[test]
    fn test_hex_dump_empty() {
        let mut console = Console::new(Sink::default());
        console.hex_dump(&[]).unwrap();
        assert!(console.into_inner().out.is_empty());
    }

    #[test]
    fn test_print_overflow() {
        let long = [b'x'; OUT_BUF_SIZE + 1];
        let long = core::str::from_utf8(&long).unwrap();
        let mut console = Console::new(Sink::default());
        assert_eq!(console.print(format_args!("{}", long)), Err(ConsoleError::Overflow));
        assert!(console.into_inner().out.is_empty());
    }

    #[test]
    fn test_print_status_lines() {
        let mut console = Console::new(Sink::default());
        console.print(format_args!("{}", GENERATING)).unwrap();
        console.print(format_args!("{}", GENERATED)).unwrap();
        assert_eq!(
            console.into_inner().out,
            b"Generating attestation token\r\n\nAttestation token generated:\r\n"
        );
    }

    #[test]
    fn test_platform_log_result() {
        assert_eq!(platform_log_result(0, 12), Ok(12));
        assert_eq!(platform_log_result(12, 12), Ok(12));
        assert_eq!(platform_log_result(3, 12), Ok(12));
        assert_eq!(platform_log_result(-132, 12), Err(ErrorKind::Other));
    }

    #[test]
    fn test_writer_failure() {
        let mut console = Console::new(Sink {
            fail: true,
            ..Default::default()
        });
        assert_eq!(
            console.hex_dump(&[1, 2, 3]),
            Err(ConsoleError::Write(ErrorKind::BrokenPipe))
        );
    }
}
