use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Kind of a filesystem entry produced by [`walk`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
}

impl EntryKind {
    /// Single-letter tag (`d` or `f`)
    pub fn tag(self) -> char {
        match self {
            EntryKind::Dir => 'd',
            EntryKind::File => 'f',
        }
    }
}

/// A directory or file found under the walk root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FsEntry {
    pub kind: EntryKind,
    pub path: PathBuf,
}

/// Lazily enumerate every directory and file below `root`
///
/// At each level the subdirectories are yielded before the files, then the
/// walk descends into each subdirectory depth-first. Entries within a level
/// are sorted by name. The root itself is not yielded. Symlinks are never
/// followed: a link to a directory is reported as a directory but not
/// descended into, any other link as a file.
pub fn walk(root: impl AsRef<Path>) -> FsWalk {
    FsWalk {
        stack: vec![root.as_ref().to_path_buf()],
        pending: VecDeque::new(),
    }
}

/// Iterator returned by [`walk`]
#[derive(Debug)]
pub struct FsWalk {
    stack: Vec<PathBuf>,
    pending: VecDeque<io::Result<FsEntry>>,
}

impl FsWalk {
    fn expand(&mut self, dir: &Path) -> io::Result<()> {
        let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.file_name());

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in entries {
            let file_type = entry.file_type()?;
            let path = entry.path();
            if file_type.is_dir() {
                dirs.push((path, true));
            } else if file_type.is_symlink() && path.is_dir() {
                dirs.push((path, false));
            } else {
                files.push(path);
            }
        }

        self.pending.extend(dirs.iter().map(|(path, _)| {
            Ok(FsEntry {
                kind: EntryKind::Dir,
                path: path.clone(),
            })
        }));
        self.pending.extend(files.into_iter().map(|path| {
            Ok(FsEntry {
                kind: EntryKind::File,
                path,
            })
        }));
        self.stack
            .extend(dirs.into_iter().rev().filter_map(|(path, descend)| descend.then_some(path)));

        Ok(())
    }
}

impl Iterator for FsWalk {
    type Item = io::Result<FsEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.pending.pop_front() {
                return Some(entry);
            }
            let dir = self.stack.pop()?;
            if let Err(e) = self.expand(&dir) {
                return Some(Err(e));
            }
        }
    }
}
