use crate::core::abundance::Abundance;
use crate::output::{OutputFiles, OutputKind, OutputNamer, PassContext, PassHandles};
use crate::Result;
use std::io::Write;

/// Write the classified identifiers one per line.
pub fn write_accnos(ctx: &PassContext<'_>, namer: OutputNamer, outputs: &mut OutputFiles) -> Result<()> {
    let mut handles = PassHandles::new(OutputKind::Accnos, namer, ctx.groups);

    match ctx.stratified {
        Some(stratified) if ctx.stratifying() => {
            for group in stratified.groups() {
                for class in Abundance::ALL {
                    for id in stratified.ids(group, class) {
                        ctx.cancel.check()?;
                        writeln!(handles.writer(Some(group), class)?, "{}", id)?;
                    }
                }
            }
        }
        _ => {
            for (id, class) in ctx.partition.iter() {
                ctx.cancel.check()?;
                writeln!(handles.writer(None, class)?, "{}", id)?;
            }
        }
    }

    handles.finish(outputs)
}
