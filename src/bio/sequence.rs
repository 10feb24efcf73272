use std::io::Write;

/// A FASTA record as read from the sequence store.
///
/// Sequence content is carried through untouched: lines are joined but never
/// upper-cased or filtered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

impl Sequence {
    pub fn new(id: String, sequence: Vec<u8>) -> Self {
        Self {
            id,
            description: None,
            sequence,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn header(&self) -> String {
        let mut header = format!(">{}", self.id);
        if let Some(desc) = &self.description {
            header.push(' ');
            header.push_str(desc);
        }
        header
    }

    /// Write the record as a header line followed by a single sequence line.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", self.header())?;
        writer.write_all(&self.sequence)?;
        writeln!(writer)
    }
}
