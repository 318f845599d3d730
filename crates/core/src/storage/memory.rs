//! Leaf memory backed by a flat byte array.
//!
//! [`FakeMemory`] terminates every cache hierarchy. It provides:
//! 1. **Flat Storage:** A byte array with fixed read and write latencies.
//! 2. **Bounds Checking:** Accesses past the capacity fail with `OutOfRange`.
//! 3. **Image Files:** Import/export of raw binary and hex text images for
//!    seeding and inspecting memory around a simulation run.
//!
//! Every access reports hit level 0: the leaf always holds the data.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::common::{Data, SimError};
use crate::storage::{DataStorage, Transaction};

/// Terminal, non-caching storage at the bottom of a hierarchy.
pub struct FakeMemory {
    name: String,
    bytes: Vec<u8>,
    read_latency: u64,
    write_latency: u64,
}

impl FakeMemory {
    /// Creates a zero-filled memory.
    ///
    /// # Arguments
    ///
    /// * `name` - Name used in hierarchy configuration and diagnostics.
    /// * `size` - Capacity in bytes.
    /// * `read_latency` - Cycles charged per read transaction.
    /// * `write_latency` - Cycles charged per write transaction.
    pub fn new(name: impl Into<String>, size: usize, read_latency: u64, write_latency: u64) -> Self {
        Self {
            name: name.into(),
            bytes: vec![0; size],
            read_latency,
            write_latency,
        }
    }

    /// Checks that `[address, address + len)` lies within the capacity.
    ///
    /// Addresses near `u64::MAX` must fail cleanly rather than wrap, so
    /// the end of the span is computed with checked arithmetic.
    fn check_range(&self, address: u64, len: usize) -> Result<(), SimError> {
        let end = usize::try_from(address)
            .ok()
            .and_then(|start| start.checked_add(len));

        match end {
            Some(end) if end <= self.bytes.len() => Ok(()),
            _ => Err(SimError::OutOfRange {
                address,
                len,
                size: self.bytes.len(),
            }),
        }
    }

    /// Resolves an inclusive end address; 0 means "to the end of memory".
    fn resolve_end(&self, end_address: u64) -> u64 {
        if end_address == 0 {
            self.bytes.len() as u64 - 1
        } else {
            end_address
        }
    }

    /// Reads one raw byte. Intended for test seeding and inspection only;
    /// simulation logic goes through [`DataStorage::read`].
    pub fn get(&self, address: u64) -> u8 {
        self.bytes[address as usize]
    }

    /// Writes one raw byte. Intended for test seeding and inspection only;
    /// simulation logic goes through [`DataStorage::write`].
    pub fn set(&mut self, address: u64, value: u8) {
        self.bytes[address as usize] = value;
    }

    /// Loads a raw binary image into memory.
    ///
    /// Bytes are placed starting at `start_address` until the image or the
    /// window `[start_address, end_address]` is exhausted; `end_address` of
    /// 0 extends the window to the end of memory.
    ///
    /// # Errors
    ///
    /// [`SimError::OutOfRange`] when `start_address` exceeds the capacity,
    /// [`SimError::Io`] when the file cannot be read.
    pub fn load_bin_file(
        &mut self,
        path: impl AsRef<Path>,
        start_address: u64,
        end_address: u64,
    ) -> Result<(), SimError> {
        self.check_range(start_address, 0)?;
        let end_address = self.resolve_end(end_address);

        let mut image = Vec::new();
        let _ = fs::File::open(path)?.read_to_end(&mut image)?;

        let mut address = start_address;
        for byte in image {
            if address > end_address {
                break;
            }
            self.bytes[address as usize] = byte;
            address += 1;
        }
        Ok(())
    }

    /// Dumps the window `[start_address, end_address]` as a raw binary image.
    ///
    /// # Errors
    ///
    /// [`SimError::OutOfRange`] when `start_address` exceeds the capacity,
    /// [`SimError::Io`] when the file cannot be written.
    pub fn dump_bin_file(
        &self,
        path: impl AsRef<Path>,
        start_address: u64,
        end_address: u64,
    ) -> Result<(), SimError> {
        self.check_range(start_address, 0)?;
        let end_address = self.resolve_end(end_address);

        let mut file = fs::File::create(path)?;
        file.write_all(&self.bytes[start_address as usize..=end_address as usize])?;
        Ok(())
    }

    /// Loads a hex text image into memory.
    ///
    /// Each line is a run of hex digits read right to left as a
    /// little-endian byte sequence: the rightmost pair lands at the lowest
    /// address. A line with an odd digit count gets a leading zero nibble.
    /// Lines are placed at consecutive addresses starting at
    /// `start_address`; loading stops once `end_address` is reached (0
    /// extends the window to the end of memory).
    ///
    /// # Errors
    ///
    /// [`SimError::OutOfRange`] when `start_address` exceeds the capacity,
    /// [`SimError::Io`] when the file cannot be read or a line contains a
    /// non-hex digit.
    pub fn load_hex_file(
        &mut self,
        path: impl AsRef<Path>,
        start_address: u64,
        end_address: u64,
    ) -> Result<(), SimError> {
        self.check_range(start_address, 0)?;
        let end_address = self.resolve_end(end_address);

        let text = fs::read_to_string(path)?;
        let mut address = start_address;

        for line in text.lines() {
            let digits: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if digits.is_empty() {
                continue;
            }

            let mut row = Vec::with_capacity(digits.len() / 2 + 1);
            let mut i = digits.len();
            while i > 0 {
                let lo = digits[i - 1];
                let hi = if i >= 2 { digits[i - 2] } else { '0' };
                let pair: String = [hi, lo].iter().collect();
                let byte = u8::from_str_radix(&pair, 16).map_err(|_| {
                    SimError::Io(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("invalid hex byte '{pair}' in memory image"),
                    ))
                })?;
                row.push(byte);
                i = i.saturating_sub(2);
            }

            for byte in row {
                if address > end_address {
                    return Ok(());
                }
                self.bytes[address as usize] = byte;
                address += 1;
            }
        }
        Ok(())
    }

    /// Dumps the window `[start_address, end_address]` as a hex text image
    /// with `bytes_per_line` two-digit bytes per line.
    ///
    /// # Errors
    ///
    /// [`SimError::OutOfRange`] when `start_address` exceeds the capacity,
    /// [`SimError::Io`] when the file cannot be written.
    pub fn dump_hex_file(
        &self,
        path: impl AsRef<Path>,
        start_address: u64,
        end_address: u64,
        bytes_per_line: usize,
    ) -> Result<(), SimError> {
        self.check_range(start_address, 0)?;
        let end_address = self.resolve_end(end_address);
        let bytes_per_line = bytes_per_line.max(1);

        let mut file = fs::File::create(path)?;
        for (i, address) in (start_address..=end_address).enumerate() {
            write!(file, "{:02x}", self.bytes[address as usize])?;
            if (i + 1) % bytes_per_line == 0 {
                writeln!(file)?;
            }
        }
        Ok(())
    }
}

impl DataStorage for FakeMemory {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn read(&mut self, address: u64, num_bytes: usize) -> Result<Transaction, SimError> {
        self.check_range(address, num_bytes)?;

        let start = address as usize;
        let data = Data::from_slice(&self.bytes[start..start + num_bytes]);

        Ok(Transaction::read(address, self.read_latency, 0, data))
    }

    fn write(&mut self, address: u64, data: &Data) -> Result<Transaction, SimError> {
        self.check_range(address, data.len())?;

        let start = address as usize;
        self.bytes[start..start + data.len()].copy_from_slice(data.as_slice());

        Ok(Transaction::write(
            address,
            self.write_latency,
            0,
            data.clone(),
        ))
    }

    fn reset(&mut self) {
        self.bytes.fill(0);
    }
}
