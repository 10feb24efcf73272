use crate::bio::sequence::Sequence;
use crate::{AbundSplitError, Result};
use flate2::read::GzDecoder;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{not_line_ending, space1},
    combinator::opt,
    sequence::preceded,
    IResult,
};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse a FASTA header line (without its line ending)
fn parse_header(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (input, _) = tag(">")(input)?;
    let (input, id) = take_till(|c: char| c == ' ' || c == '\t')(input)?;
    let (input, description) = opt(preceded(space1, not_line_ending))(input)?;
    Ok((input, (id, description.filter(|d| !d.is_empty()))))
}

/// Streaming FASTA reader.
///
/// Records are produced one at a time so a pass over the sequence store never
/// holds more than one record in memory.
pub struct FastaReader<R> {
    reader: R,
    buffer: String,
    pending_header: Option<String>,
    line: usize,
    done: bool,
}

impl FastaReader<Box<dyn BufRead>> {
    /// Open a FASTA file (supports .gz compression)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let reader: Box<dyn BufRead> = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
            Box::new(BufReader::new(GzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(Self::new(reader))
    }
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            pending_header: None,
            line: 0,
            done: false,
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        if self.reader.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        Ok(Some(self.buffer.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn next_record(&mut self) -> Result<Option<Sequence>> {
        loop {
            let header = match self.pending_header.take() {
                Some(header) => header,
                None => loop {
                    match self.read_line()? {
                        None => return Ok(None),
                        Some(line) if line.trim().is_empty() => continue,
                        Some(line) if line.starts_with('>') => break line,
                        Some(line) => {
                            return Err(AbundSplitError::Parse(format!(
                                "line {}: expected a FASTA header, found '{}'",
                                self.line, line
                            )))
                        }
                    }
                },
            };

            let (id, description) = parse_header(&header)
                .map(|(_, parsed)| parsed)
                .map_err(|_| {
                    AbundSplitError::Parse(format!("line {}: malformed FASTA header", self.line))
                })?;
            let id = id.to_string();
            let description = description.map(str::to_string);

            let mut sequence = Vec::new();
            while let Some(line) = self.read_line()? {
                if line.starts_with('>') {
                    self.pending_header = Some(line);
                    break;
                }
                sequence.extend(line.trim().as_bytes());
            }

            if id.is_empty() {
                tracing::warn!("Skipping FASTA record without a name near line {}", self.line);
                continue;
            }

            let mut record = Sequence::new(id, sequence);
            if let Some(desc) = description {
                record = record.with_description(desc);
            }
            return Ok(Some(record));
        }
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<Sequence>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
