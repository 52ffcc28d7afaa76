//! File content helpers shared by the native workers.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Bytes sniffed from the head of a file for the binary check.
pub const BINARY_CHECK_SIZE: usize = 2048;

/// A file is treated as binary when its leading bytes contain a NUL.
/// Unreadable files are also treated as binary, so scans skip them.
pub fn is_binary(path: &Path) -> bool {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return true,
    };
    let mut head = Vec::with_capacity(BINARY_CHECK_SIZE);
    match file.take(BINARY_CHECK_SIZE as u64).read_to_end(&mut head) {
        Ok(_) => memchr::memchr(0, &head).is_some(),
        Err(_) => true,
    }
}

/// Iterator over a file's lines, decoded lossily with line endings
/// removed. Non-UTF-8 bytes become replacement characters instead of
/// aborting the file.
pub struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl LossyLines<BufReader<File>> {
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> LossyLines<R> {
    pub fn new(reader: R) -> Self {
        LossyLines {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = String::from_utf8_lossy(&self.buf);
                Some(Ok(line.trim_end_matches(['\n', '\r']).to_string()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
