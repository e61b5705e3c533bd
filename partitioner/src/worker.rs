//! The child side of the process pool.

use std::io::{self, BufReader, BufWriter, Read, Write};

use crate::frame::{self, FrameError, WorkItem, WorkerReply};

/// Reads one [`WorkItem`], searches its values and writes one [`WorkerReply`].
pub fn serve<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<WorkerReply, FrameError> {
    let item = frame::read_work_item(reader)?;
    let reply = answer(&item);
    frame::write_frame(writer, &reply)?;
    Ok(reply)
}

/// [`serve`] over this process's stdin and stdout.
pub fn serve_stdio() -> Result<WorkerReply, FrameError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = BufReader::new(stdin.lock());
    let mut writer = BufWriter::new(stdout.lock());
    let reply = serve(&mut reader, &mut writer)?;
    writer.flush()?;
    Ok(reply)
}

fn answer(item: &WorkItem) -> WorkerReply {
    match peakfinder::find_peak(&item.values, 0, item.values.len().saturating_sub(1)) {
        Ok(peak) => WorkerReply::Max {
            chunk: item.chunk,
            index: item.offset + peak.index,
            value: peak.value,
        },
        Err(err) => WorkerReply::Failed {
            chunk: item.chunk,
            reason: err.to_string(),
        },
    }
}
