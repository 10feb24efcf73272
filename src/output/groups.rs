use crate::output::{OutputFiles, OutputKind, OutputNamer, PassContext, PassHandles};
use crate::Result;
use std::io::Write;

/// Write `identifier <tab> group` for every duplicate reachable from the
/// classified representatives, under the representative's class.
pub fn write_groups(ctx: &PassContext<'_>, namer: OutputNamer, outputs: &mut OutputFiles) -> Result<()> {
    let mut handles = PassHandles::new(OutputKind::Groups, namer, ctx.groups);
    let stratifying = ctx.stratifying();

    for (_, class, duplicates) in ctx.representatives() {
        ctx.cancel.check()?;

        for duplicate in duplicates {
            let Some(group) = ctx.group_of(duplicate) else {
                // stratified runs report these once per label
                if stratifying {
                    tracing::debug!("{} has no group, skipped", duplicate);
                } else {
                    tracing::warn!("{} is not in your groupfile, ignoring, please correct.", duplicate);
                }
                continue;
            };

            if !stratifying {
                writeln!(handles.writer(None, class)?, "{}\t{}", duplicate, group)?;
            } else if ctx.is_selected(group) {
                writeln!(handles.writer(Some(group), class)?, "{}\t{}", duplicate, group)?;
            }
        }
    }

    handles.finish(outputs)
}
