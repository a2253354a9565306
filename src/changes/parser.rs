use thiserror::Error;

/// Leading token of every changelist header line in `p4 changes` output.
const HEADER_MARKER: &str = "Change";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed change header (expected at least 7 fields): {line:?}")]
    MalformedHeader { line: String },

    #[error("non-numeric change number in header: {line:?}")]
    BadChangeNumber { line: String },
}

/// One submitted changelist as reported by the upstream server.
///
/// `date` and `time` are passed through verbatim; their format belongs to the
/// server. `author` is the raw `user@workspace` string. Splitting off the
/// workspace suffix is a rendering concern, not a parsing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub number: u64,
    pub date: String,
    pub time: String,
    pub author: String,
    pub description: String,
}

/// Result of parsing one fetch worth of raw log text.
///
/// `changes` preserves the upstream emission order (newest first). `newest`
/// is the change number from the first header line seen, i.e. the highest
/// number in the batch, and is `None` only for empty input.
#[derive(Debug, Default)]
pub struct ParsedBatch {
    pub changes: Vec<Change>,
    pub newest: Option<u64>,
}

/// A line opens a new change block iff its first field is the `Change`
/// marker and the line is not indented. Description lines in `-l` output are
/// always indented, so an unindented marker is unambiguous.
fn is_header(line: &str) -> bool {
    !line.starts_with(char::is_whitespace)
        && line.split_whitespace().next() == Some(HEADER_MARKER)
}

struct Header {
    number: u64,
    date: String,
    time: String,
    author: String,
}

impl Header {
    /// Fields sit at fixed positions: `Change <num> on <date> <time> by
    /// <user@workspace> ...`. Anything past the author is ignored.
    fn parse(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 7 {
            return Err(ParseError::MalformedHeader {
                line: line.to_string(),
            });
        }

        let number = fields[1]
            .parse::<u64>()
            .map_err(|_| ParseError::BadChangeNumber {
                line: line.to_string(),
            })?;

        Ok(Self {
            number,
            date: fields[3].to_string(),
            time: fields[4].to_string(),
            author: fields[6].to_string(),
        })
    }

    fn into_change(self, description: String) -> Change {
        Change {
            number: self.number,
            date: self.date,
            time: self.time,
            author: self.author,
            description,
        }
    }
}

/// Splits raw multi-line change-log text into discrete [`Change`] records.
///
/// Walks the lines with two pieces of state: the header whose block is
/// currently open, and the accumulated description for that block. A new
/// header closes the previous block; end of input closes the last one. A
/// malformed header anywhere aborts the whole batch so the watermark is
/// never advanced past a change we could not account for.
pub fn parse_changes(raw: &str) -> Result<ParsedBatch, ParseError> {
    let mut batch = ParsedBatch::default();
    let mut pending: Option<Header> = None;
    let mut content = String::new();

    for line in raw.lines() {
        if is_header(line) {
            let header = Header::parse(line)?;
            if let Some(open) = pending.take() {
                batch
                    .changes
                    .push(open.into_change(std::mem::take(&mut content)));
            } else {
                // First header in the batch carries the newest number;
                // upstream emits most-recent-first.
                batch.newest = Some(header.number);
            }
            pending = Some(header);
        } else if pending.is_some() {
            content.push_str(line);
            content.push('\n');
        }
        // Lines before the first header have nothing to belong to; the
        // upstream tool never produces them, so they are dropped.
    }

    if let Some(open) = pending.take() {
        batch.changes.push(open.into_change(content));
    }

    Ok(batch)
}
