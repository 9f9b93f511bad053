use std::io::Write;

use crate::ChatRecord;

/// Tabular container the split halves are handed to: built once from an
/// ordered sequence, then read by index.
pub trait RecordSink: Sized {
    fn from_records(records: Vec<ChatRecord>) -> Self;
    fn len(&self) -> usize;
    fn get(&self, index: usize) -> Option<&ChatRecord>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordSink for Vec<ChatRecord> {
    fn from_records(records: Vec<ChatRecord>) -> Self {
        records
    }

    fn len(&self) -> usize {
        <[ChatRecord]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&ChatRecord> {
        <[ChatRecord]>::get(self, index)
    }
}

/// Write records back out as JSONL: `{"messages":[...]}` per line.
pub fn write_jsonl<W: Write>(records: &[ChatRecord], mut out: W) -> std::io::Result<()> {
    for rec in records {
        serde_json::to_writer(&mut out, rec)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}
