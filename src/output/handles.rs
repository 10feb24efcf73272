use crate::core::abundance::Abundance;
use crate::output::{OutputFiles, OutputKind, OutputNamer};
use crate::Result;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

type HandleKey = (Option<String>, Abundance);

/// Output handles of a single writer pass.
///
/// One handle per `(group, class)` key, opened on first use. [`finish`]
/// creates the files that were never written to, flushes everything and
/// registers the paths. Dropping an unfinished pass (error or cancellation)
/// closes the handles and removes every file it created.
///
/// [`finish`]: PassHandles::finish
pub struct PassHandles {
    kind: OutputKind,
    namer: OutputNamer,
    keys: Vec<HandleKey>,
    handles: BTreeMap<HandleKey, BufWriter<File>>,
    created: Vec<PathBuf>,
    finished: bool,
}

impl PassHandles {
    /// `groups` empty gives a single rare/abundant pair
    pub fn new(kind: OutputKind, namer: OutputNamer, groups: &[String]) -> Self {
        let keys = if groups.is_empty() {
            Abundance::ALL.iter().map(|class| (None, *class)).collect()
        } else {
            groups
                .iter()
                .flat_map(|group| Abundance::ALL.iter().map(move |class| (Some(group.clone()), *class)))
                .collect()
        };

        Self {
            kind,
            namer,
            keys,
            handles: BTreeMap::new(),
            created: Vec::new(),
            finished: false,
        }
    }

    fn path_for(&self, key: &HandleKey) -> PathBuf {
        self.namer.path(self.kind, key.0.as_deref(), key.1)
    }

    /// Writer for `(group, class)`, opening the file if needed
    pub fn writer(&mut self, group: Option<&str>, class: Abundance) -> Result<&mut BufWriter<File>> {
        match self.handles.entry((group.map(str::to_string), class)) {
            Entry::Occupied(handle) => Ok(handle.into_mut()),
            Entry::Vacant(slot) => {
                let path = self.namer.path(self.kind, slot.key().0.as_deref(), class);
                tracing::debug!("Opening {}", path.display());
                let file = File::create(&path)?;
                self.created.push(path);
                Ok(slot.insert(BufWriter::new(file)))
            }
        }
    }

    /// Close the pass and record its files in `outputs`
    pub fn finish(mut self, outputs: &mut OutputFiles) -> Result<()> {
        for key in self.keys.clone() {
            let writer = self.writer(key.0.as_deref(), key.1)?;
            writer.flush()?;
        }
        self.handles.clear();

        for key in &self.keys {
            outputs.push(self.kind, self.path_for(key));
        }
        self.finished = true;
        Ok(())
    }
}

impl Drop for PassHandles {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.handles.clear();
        for path in &self.created {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::warn!("Could not remove partial output {}: {}", path.display(), e);
            } else {
                tracing::debug!("Removed partial output {}", path.display());
            }
        }
    }
}
