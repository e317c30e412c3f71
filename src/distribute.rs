use anyhow::{bail, ensure, Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::PathBuf;

use crate::tree::Directory;

/// Cap on distinct duplicate names, independent of the duplicate budget.
pub const MAX_DUPE_NAMES: usize = 20;
/// Copies emitted per duplicate batch. A final batch may stretch one past
/// this to absorb a stray budget of 1, which could not seed a group of 2.
pub const MAX_BATCH: usize = 5;

const CONTENT_LEN: usize = 100;
const CONTENT_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 \n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Unique,
    Duplicate,
}

/// One physical file written to disk.
#[derive(Debug, Clone)]
pub struct FileInstance {
    pub name: String,
    pub path: PathBuf,
}

/// A logical filename and every location it was written to. Unique groups
/// hold exactly one path; duplicate groups hold at least two, all in
/// distinct directories, all sharing `content`.
#[derive(Debug)]
pub struct FileGroup {
    pub name: String,
    pub kind: GroupKind,
    pub content: String,
    pub paths: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct Distribution {
    pub instances: Vec<FileInstance>,
    pub groups: Vec<FileGroup>,
}

/// Split `count` into unique files and duplicate copies per `dupe_percent`,
/// write every file under a randomly chosen directory, and return the full
/// instance list plus the per-name groups.
///
/// Unique files each land in one uniformly chosen directory. Copies of a
/// duplicate name are spread over *distinct* directories, so the physical
/// file count always equals `count` exactly. A duplicate budget below 2 is
/// folded to zero since a single copy cannot form a duplicate group.
///
/// Configuration checks and batch planning all run before the first file is
/// written; a rejected configuration leaves the tree untouched.
pub fn distribute<R: Rng>(
    count: usize,
    dupe_percent: u32,
    dirs: &[Directory],
    rng: &mut R,
) -> Result<Distribution> {
    ensure!(
        !dirs.is_empty() || count == 0,
        "cannot place {count} files: the directory tree is empty"
    );

    let mut num_dupes = count * dupe_percent as usize / 100;
    if num_dupes < 2 {
        num_dupes = 0;
    }
    let num_unique = count - num_dupes;

    let planned = if num_dupes > 0 {
        let pool = (num_dupes / 2).min(MAX_DUPE_NAMES);
        ensure!(
            dirs.len() >= 2,
            "duplicate copies need at least 2 directories, the tree has {}",
            dirs.len()
        );
        ensure!(
            num_dupes <= pool * dirs.len(),
            "duplicate budget {num_dupes} exceeds tree capacity ({pool} names x {} directories)",
            dirs.len()
        );
        plan_batches(num_dupes, pool, dirs.len(), rng)?
    } else {
        Vec::new()
    };

    let mut instances = Vec::with_capacity(count);
    let mut groups = Vec::new();

    for i in 1..=num_unique {
        let name = format!("u{i}.txt");
        let content = random_content(rng);
        let dir = &dirs[rng.gen_range(0..dirs.len())];
        let path = write_instance(dir, &name, &content)?;
        instances.push(FileInstance {
            name: name.clone(),
            path: path.clone(),
        });
        groups.push(FileGroup {
            name,
            kind: GroupKind::Unique,
            content,
            paths: vec![path],
        });
    }

    for (i, &copies) in planned.iter().enumerate() {
        if copies == 0 {
            continue;
        }
        let name = format!("d{}.txt", i + 1);
        let content = random_content(rng);
        let targets: Vec<&Directory> = dirs.choose_multiple(rng, copies).collect();
        let mut paths = Vec::with_capacity(copies);
        for dir in targets {
            let path = write_instance(dir, &name, &content)?;
            instances.push(FileInstance {
                name: name.clone(),
                path: path.clone(),
            });
            paths.push(path);
        }
        groups.push(FileGroup {
            name,
            kind: GroupKind::Duplicate,
            content,
            paths,
        });
    }

    Ok(Distribution { instances, groups })
}

/// Partition the duplicate budget into per-name copy counts.
///
/// Repeatedly picks a random pool name and adds a batch of 2..=MAX_BATCH
/// copies, clamped so no batch overshoots the remaining budget and no name
/// exceeds one copy per directory. A pick that would leave a remainder of
/// exactly 1 is stretched or shrunk by one copy. Names never picked stay at
/// zero; every nonzero count is at least 2.
fn plan_batches<R: Rng>(
    num_dupes: usize,
    pool: usize,
    num_dirs: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    let mut planned = vec![0usize; pool];
    let mut remaining = num_dupes;
    let mut stalls = 0;

    while remaining > 0 {
        if stalls > 16 * pool {
            bail!(
                "could not spread {remaining} remaining duplicate copies over \
                 {num_dirs} directories; use more directories or a smaller duplicate budget"
            );
        }
        let i = rng.gen_range(0..pool);
        let room = num_dirs - planned[i];
        let hi = room.min(MAX_BATCH).min(remaining);
        if hi < 2 {
            stalls += 1;
            continue;
        }
        let mut batch = rng.gen_range(2..=hi);
        if remaining - batch == 1 {
            if batch + 1 <= room {
                batch += 1;
            } else if batch > 2 {
                batch -= 1;
            } else {
                stalls += 1;
                continue;
            }
        }
        planned[i] += batch;
        remaining -= batch;
        stalls = 0;
    }

    Ok(planned)
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn write_instance(dir: &Directory, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.path.join(name);
    fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn random_content<R: Rng>(rng: &mut R) -> String {
    (0..CONTENT_LEN)
        .map(|_| CONTENT_CHARSET[rng.gen_range(0..CONTENT_CHARSET.len())] as char)
        .collect()
}
