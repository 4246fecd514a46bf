use std::borrow::Cow;
use std::io::{self, BufRead};

/// Result of handling a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
}

/// Read one line, blocking. Returns `None` at end of input.
///
/// Bytes that are not valid UTF-8 become U+FFFD rather than an error.
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(&buf);
    if let Cow::Owned(_) = line {
        log::warn!("input line was not valid UTF-8");
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
