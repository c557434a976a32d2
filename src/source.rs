use crate::error::Result;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Newline-delimited keys pulled from a reader.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. They are kept as raw bytes so
/// 8-bit encodings pass through untouched. Leading and trailing ASCII
/// whitespace is trimmed; a blank line yields an empty key. Non-ASCII bytes
/// such as Latin-1 `\xa0` are key data and are never trimmed.
#[derive(Debug)]
pub struct KeyLines<R> {
    reader: R,
    buf: Vec<u8>,
    // Previous line ended in `\r`; a `\n` right after it belongs to that line.
    after_cr: bool,
}

impl<R: BufRead> KeyLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            after_cr: false,
        }
    }

    fn take_line(&mut self) -> Vec<u8> {
        self.buf.trim_ascii().to_vec()
    }
}

impl<R: BufRead> Iterator for KeyLines<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        let mut started = false;

        loop {
            let available = match self.reader.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Some(Err(e)),
            };
            if available.is_empty() {
                break;
            }

            if self.after_cr {
                self.after_cr = false;
                if available[0] == b'\n' {
                    self.reader.consume(1);
                    continue;
                }
            }
            started = true;

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(end) => {
                    self.after_cr = available[end] == b'\r';
                    self.buf.extend_from_slice(&available[..end]);
                    self.reader.consume(end + 1);
                    return Some(Ok(self.take_line()));
                }
                None => {
                    let len = available.len();
                    self.buf.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }

        // Last line without a terminator
        started.then(|| Ok(self.take_line()))
    }
}

/// Opens `path` for sequential key reads.
pub fn read_keys(path: impl AsRef<Path>) -> Result<KeyLines<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(KeyLines::new(BufReader::new(file)))
}
