use crate::bio::list::ListVector;
use crate::core::abundance::{classify, Abundance};
use crate::output::{OutputFiles, OutputKind, OutputNamer, PassContext, PassHandles};
use crate::Result;
use std::collections::BTreeMap;
use std::io::Write;

/// Write the rare and abundant bins of `snapshot` as two list files, or two
/// per selected group.
///
/// Each file holds a single line, `label numBins bin bin ...`, and stays
/// empty when its class has no bins.
pub fn write_list(
    ctx: &PassContext<'_>,
    snapshot: &ListVector,
    namer: OutputNamer,
    outputs: &mut OutputFiles,
) -> Result<()> {
    let mut handles = PassHandles::new(OutputKind::List, namer, ctx.groups);
    let cutoff = ctx.partition.cutoff();

    if !ctx.stratifying() {
        // Totals are known up front, so bins stream straight out
        let mut started = [false; 2];
        for bin in snapshot.bins() {
            ctx.cancel.check()?;
            let class = classify(bin.len(), cutoff);
            let slot = class as usize;
            let writer = handles.writer(None, class)?;
            if !started[slot] {
                write!(writer, "{}\t{}", snapshot.label(), ctx.partition.bins(class))?;
                started[slot] = true;
            }
            write!(writer, "\t{}", bin.join(","))?;
        }
        for class in Abundance::ALL {
            if started[class as usize] {
                writeln!(handles.writer(None, class)?)?;
            }
        }
        return handles.finish(outputs);
    }

    // Per-group bin counts are only known after the whole snapshot is seen
    let mut group_bins: BTreeMap<(String, Abundance), Vec<String>> = BTreeMap::new();
    for bin in snapshot.bins() {
        ctx.cancel.check()?;
        let class = classify(bin.len(), cutoff);

        let mut pieces: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for id in bin {
            match ctx.group_of(id) {
                Some(group) if ctx.is_selected(group) => pieces.entry(group).or_default().push(id),
                Some(_) => {}
                None => tracing::debug!("{} has no group, skipped", id),
            }
        }

        for (group, members) in pieces {
            group_bins
                .entry((group.to_string(), class))
                .or_default()
                .push(members.join(","));
        }
    }

    for ((group, class), bins) in &group_bins {
        ctx.cancel.check()?;
        let writer = handles.writer(Some(group), *class)?;
        writeln!(writer, "{}\t{}\t{}", snapshot.label(), bins.len(), bins.join("\t"))?;
    }

    handles.finish(outputs)
}
