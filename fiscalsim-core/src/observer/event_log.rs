//! Turn log observer writing one JSON line per resolved turn.
//!
//! ```json
//! {"year":2026,"debt":39.95,"gdp":102.22,...,"events":[],"outcome":"victory"}
//! ```
//!
//! Output goes to any `Write` destination (stdout, file, pipe), which makes
//! the log easy to feed into `jq` or a plotting script.

use super::{ObserverError, TurnObserver, TurnRecord};
use std::fs::File;
use std::io::{BufWriter, Stdout, Write};
use std::path::Path;

pub struct EventLogObserver<W: Write> {
    writer: W,
    lines: u64,
}

impl EventLogObserver<BufWriter<Stdout>> {
    /// Log to stdout.
    pub fn stdout() -> Self {
        Self::new(BufWriter::new(std::io::stdout()))
    }
}

impl EventLogObserver<BufWriter<File>> {
    /// Log to a freshly created file.
    pub fn file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventLogObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Lines written so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, record: &TurnRecord) -> Result<(), ObserverError> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(self.writer)?;
        self.lines += 1;
        Ok(())
    }
}

impl<W: Write + Send> TurnObserver for EventLogObserver<W> {
    fn on_turn(&mut self, record: &TurnRecord) -> Result<(), ObserverError> {
        self.write_record(record)?;
        // Game over is the last line we will see.
        if record.outcome.is_some() {
            self.writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "EventLogObserver"
    }

    fn on_shutdown(&mut self) {
        if let Err(e) = self.writer.flush() {
            log::warn!("EventLogObserver flush failed: {}", e);
        }
    }
}
