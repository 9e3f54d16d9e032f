//! Serial console front end for the control channel.
//!
//! Line oriented, one request per line:
//!
//! - `?` reads the LED. The reply is the raw level byte (`0x00` / `0x01`)
//!   followed by `\n`.
//! - Anything else is handed to the device write path. The reply is `OK\n`,
//!   or `ERR <error>\n` if the command was rejected.
//!
//! On the firmware stdin/stdout are bound to the console UART by the
//! `CreateNode` registration stage.

use std::io::{self, BufRead, Write};

use log::{debug, info};

use crate::app::control::{ControlChannel, ControlSession};
use crate::app::ports::PinPort;

/// Line that requests a read instead of a write.
const QUERY_LINE: &[u8] = b"?";

pub struct ConsoleAdapter<P: PinPort> {
    session: ControlSession<P>,
}

impl<P: PinPort> ConsoleAdapter<P> {
    /// Open a session on `channel`; it is released when the adapter drops.
    pub fn new(channel: &ControlChannel<P>) -> Self {
        Self {
            session: channel.open(),
        }
    }

    /// Serve one line (terminator optional) and write the reply to `out`.
    pub fn handle_line(&mut self, line: &[u8], out: &mut impl Write) -> io::Result<()> {
        if trim_eol(line) == QUERY_LINE {
            let mut byte = [0u8; 1];
            match self.session.read(&mut byte) {
                Ok(_) => {
                    out.write_all(&byte)?;
                    out.write_all(b"\n")?;
                }
                Err(e) => writeln!(out, "ERR {}", e)?,
            }
        } else {
            let report = self.session.write(line);
            debug!("console: {} bytes consumed", report.consumed);
            match report.result {
                Ok(_) => out.write_all(b"OK\n")?,
                Err(e) => writeln!(out, "ERR {}", e)?,
            }
        }
        out.flush()
    }

    /// Serve lines from `input` until EOF.
    pub fn run(&mut self, mut input: impl BufRead, mut out: impl Write) -> io::Result<()> {
        let mut line = Vec::with_capacity(16);
        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                info!("console: input closed");
                return Ok(());
            }
            self.handle_line(&line, &mut out)?;
        }
    }
}

fn trim_eol(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
