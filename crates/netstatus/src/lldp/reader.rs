//! Streaming reader for LLDP neighbor logs.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::iter::FusedIterator;
use std::path::Path;

use super::LldpNeighbor;
use super::frame::decode_frame;
use crate::netlink::error::Result;

/// Why a log reader stopped yielding neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The log ended on a record boundary.
    Eof,
    /// The log ended inside a length prefix or a payload.
    Truncated,
    /// A record did not decode as an LLDP frame.
    Malformed,
    /// Reading failed.
    Io,
}

/// Iterator over the neighbors recorded in an LLDP log.
///
/// Problems with the log end iteration instead of producing errors:
/// neighbors already yielded stay valid and [`termination`] tells why the
/// stream stopped.
///
/// [`termination`]: LldpLogReader::termination
#[derive(Debug)]
pub struct LldpLogReader<R> {
    reader: R,
    termination: Option<Termination>,
}

impl LldpLogReader<BufReader<File>> {
    /// Open a log file. A log that does not exist is `Ok(None)`.
    pub fn open(path: impl AsRef<Path>) -> Result<Option<Self>> {
        match File::open(path.as_ref()) {
            Ok(file) => Ok(Some(Self::new(BufReader::new(file)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl<R: Read> LldpLogReader<R> {
    /// Read records from any byte stream.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            termination: None,
        }
    }

    /// Why iteration stopped, once it has.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    fn stop(&mut self, termination: Termination) -> Option<LldpNeighbor> {
        self.termination = Some(termination);
        None
    }

    fn read_record(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut prefix = [0u8; 8];
        let mut filled = 0;
        while filled < prefix.len() {
            match self.reader.read(&mut prefix[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        match filled {
            0 => return Ok(None),
            8 => {}
            _ => return Err(io::ErrorKind::UnexpectedEof.into()),
        }

        let len = u64::from_le_bytes(prefix);
        let mut payload = Vec::new();
        (&mut self.reader).take(len).read_to_end(&mut payload)?;
        if (payload.len() as u64) < len {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        Ok(Some(payload))
    }
}

impl<R: Read> Iterator for LldpLogReader<R> {
    type Item = LldpNeighbor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.termination.is_some() {
            return None;
        }

        let payload = match self.read_record() {
            Ok(Some(payload)) => payload,
            Ok(None) => return self.stop(Termination::Eof),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                tracing::warn!("Premature end of file, ignoring.");
                return self.stop(Termination::Truncated);
            }
            Err(e) => {
                tracing::warn!("Failed to read LLDP log, ignoring: {}", e);
                return self.stop(Termination::Io);
            }
        };

        match decode_frame(&payload) {
            Ok(neighbor) => Some(neighbor),
            Err(e) => {
                tracing::warn!("Failed to parse LLDP data, ignoring: {}", e);
                self.stop(Termination::Malformed)
            }
        }
    }
}

impl<R: Read> FusedIterator for LldpLogReader<R> {}
