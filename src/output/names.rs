use crate::output::{OutputFiles, OutputKind, OutputNamer, PassContext, PassHandles};
use crate::Result;
use std::collections::BTreeMap;
use std::io::Write;

/// Write `representative <tab> duplicates` lines filed by abundance.
///
/// When stratifying, a representative's duplicates are split by group and
/// the first duplicate seen in each group heads that group's line.
pub fn write_names(ctx: &PassContext<'_>, namer: OutputNamer, outputs: &mut OutputFiles) -> Result<()> {
    let mut handles = PassHandles::new(OutputKind::Names, namer, ctx.groups);

    for (representative, class, duplicates) in ctx.representatives() {
        ctx.cancel.check()?;

        if !ctx.stratifying() {
            let writer = handles.writer(None, class)?;
            writeln!(writer, "{}\t{}", representative, duplicates.join(","))?;
            continue;
        }

        let mut by_group: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for duplicate in duplicates {
            match ctx.group_of(duplicate) {
                Some(group) if ctx.is_selected(group) => by_group.entry(group).or_default().push(duplicate),
                Some(_) => {}
                None => tracing::debug!("{} has no group, skipped", duplicate),
            }
        }

        for (group, members) in by_group {
            let writer = handles.writer(Some(group), class)?;
            writeln!(writer, "{}\t{}", members[0], members.join(","))?;
        }
    }

    handles.finish(outputs)
}
