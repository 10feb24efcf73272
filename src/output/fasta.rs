use crate::bio::fasta::FastaReader;
use crate::output::{OutputFiles, OutputKind, OutputNamer, PassContext, PassHandles};
use crate::Result;
use std::path::Path;

/// Stream the sequence store once, copying every classified record into its
/// class (and group) file.
pub fn write_fasta(
    ctx: &PassContext<'_>,
    fasta: &Path,
    namer: OutputNamer,
    outputs: &mut OutputFiles,
) -> Result<()> {
    let mut handles = PassHandles::new(OutputKind::Fasta, namer, ctx.groups);
    let stratifying = ctx.stratifying();

    for record in FastaReader::open(fasta)? {
        ctx.cancel.check()?;
        let record = record?;

        let Some(class) = ctx.partition.class_of(&record.id) else {
            tracing::warn!("{} is not in your namesfile, ignoring.", record.id);
            continue;
        };

        if !stratifying {
            record.write_to(handles.writer(None, class)?)?;
            continue;
        }

        match ctx.group_of(&record.id) {
            Some(group) if ctx.is_selected(group) => {
                record.write_to(handles.writer(Some(group), class)?)?;
            }
            Some(_) => {}
            None => tracing::debug!("{} has no group, skipped", record.id),
        }
    }

    handles.finish(outputs)
}
