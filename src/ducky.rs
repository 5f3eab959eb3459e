/*!
 * DuckyScript v1.0 payload text.
 * Layout is consumed by other tools, so header and line format must stay byte exact.
 */

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::PayloadError;

pub const HEADER: &str = "REM =========================================\n\
REM Auto-generated random codes for Flipper Zero\n\
REM Compatible with legacy DuckyScript v1.0\n\
REM =========================================\n\
DELAY 400\n\
DEFAULT_DELAY 200\n\
\n";

/// Full payload text: header followed by `STRING dddd` / `ENTER` pair per code.
pub fn render(codes: &[u16]) -> String {
    // "STRING 0000\nENTER\n" is 18 bytes
    let mut text = String::with_capacity(HEADER.len() + codes.len() * 18);
    text.push_str(HEADER);
    for code in codes {
        // Writing into String can not fail.
        let _ = write!(text, "STRING {:04}\nENTER\n", code);
    }
    text
}

/// Writes payload to `path`, replacing the file if it exists.
/// On failure a partially written file stays on disk.
pub fn write_script(path: &Path, codes: &[u16]) -> Result<(), PayloadError> {
    let context = || format!("Cannot write payload file {}", path.display());
    let file = File::create(path).map_err(|e| PayloadError::io(context(), e))?;
    let mut out = BufWriter::new(file);
    let text = render(codes);
    out.write_all(text.as_bytes()).map_err(|e| PayloadError::io(context(), e))?;
    out.flush().map_err(|e| PayloadError::io(context(), e))?;
    info!(path = %path.display(), codes = codes.len(), bytes = text.len(), "payload written");
    Ok(())
}

///////////////////////////////////////////////////////////////////////////////////////////////////
/// Tests
///
