//! File operations delivered to reload handlers.

use std::fmt;
use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};

/// A file change as seen by a domain handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    Create,
    Write,
    Remove,
    Rename,
}

impl FileOp {
    /// Create and write both (re)load the file.
    pub fn is_load(self) -> bool {
        matches!(self, FileOp::Create | FileOp::Write)
    }
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileOp::Create => "create",
            FileOp::Write => "write",
            FileOp::Remove => "remove",
            FileOp::Rename => "rename",
        })
    }
}

/// Translate a notify event into per-path file operations.
///
/// A rename reports the old path as `Rename` and the new path as `Create`.
/// Access and metadata-only events produce nothing.
pub fn file_ops(event: &Event) -> Vec<(FileOp, PathBuf)> {
    let op = match event.kind {
        EventKind::Create(_) => FileOp::Create,
        EventKind::Remove(_) => FileOp::Remove,
        EventKind::Modify(ModifyKind::Name(mode)) => return rename_ops(mode, &event.paths),
        EventKind::Modify(ModifyKind::Metadata(_)) => return Vec::new(),
        EventKind::Modify(_) => FileOp::Write,
        _ => return Vec::new(),
    };

    event.paths.iter().map(|p| (op, p.clone())).collect()
}

fn rename_ops(mode: RenameMode, paths: &[PathBuf]) -> Vec<(FileOp, PathBuf)> {
    match mode {
        RenameMode::From => paths.iter().map(|p| (FileOp::Rename, p.clone())).collect(),
        RenameMode::To => paths.iter().map(|p| (FileOp::Create, p.clone())).collect(),
        RenameMode::Both => {
            let mut ops = Vec::with_capacity(paths.len());
            if let Some((from, rest)) = paths.split_first() {
                ops.push((FileOp::Rename, from.clone()));
                ops.extend(rest.iter().map(|p| (FileOp::Create, p.clone())));
            }
            ops
        }
        // Backends that cannot tell the two sides apart: decide by existence
        _ => paths
            .iter()
            .map(|p| {
                let op = if p.exists() { FileOp::Create } else { FileOp::Rename };
                (op, p.clone())
            })
            .collect(),
    }
}
