//! Writing structured results to stdout.

use std::io::{self, Write};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::json_envelope::{ErrorPayload, EventType, JsonEnvelope};

/// Write one envelope as a single JSON line.
pub fn write_envelope<W: Write, T: Serialize>(
    writer: &mut W,
    event: EventType,
    payload: T,
) -> Result<()> {
    let envelope = JsonEnvelope::new(event, payload);
    let json = serde_json::to_string(&envelope).map_err(|e| Error::JsonSerialize { source: e })?;
    writeln!(writer, "{json}")?;
    writer.flush()?;
    Ok(())
}

/// Emit a JSON result event to stdout.
///
/// This is used by command handlers to output structured results when
/// running in JSON output mode.
pub fn emit_json_result<T: Serialize>(payload: &T) {
    if let Err(e) = write_envelope(&mut io::stdout().lock(), EventType::Result, payload) {
        // Log to stderr so it doesn't corrupt JSON output stream
        eprintln!("error: failed to write JSON result: {e}");
    }
}

/// Emit a JSON error event to stdout.
pub fn emit_json_error(error: &Error) {
    let payload = ErrorPayload::from(error);
    if let Err(e) = write_envelope(&mut io::stdout().lock(), EventType::Error, &payload) {
        eprintln!("error: failed to write JSON error: {e}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_write_envelope_single_line() {
        let mut buffer = Vec::new();
        write_envelope(
            &mut buffer,
            EventType::Error,
            ErrorPayload::from(&Error::CompilationInProgress),
        )
        .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("\"event\":\"error\""));
        assert!(output.contains("\"code\":\"compilation_in_progress\""));
    }

    #[test]
    fn test_write_envelope_reports_write_errors() {
        struct FailingWriter;
        impl Write for FailingWriter {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let result = write_envelope(&mut FailingWriter, EventType::Result, "x");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
