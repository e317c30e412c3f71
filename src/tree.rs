use anyhow::{Context, Result};
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

/// One node of the generated hierarchy. `depth` is 0 for top-level
/// directories; `parent` indexes into the vector returned by [`build`].
#[derive(Debug, Clone)]
pub struct Directory {
    pub path: PathBuf,
    pub depth: u32,
    pub parent: Option<usize>,
}

/// Build the nested directory tree under `root` and return every created
/// directory, tops first, each branch depth-first after its top.
///
/// `top_dirs` directories named `top_0..` are created directly under the
/// root. Below them, each directory gets a random number of children in
/// `[0, fanout]`, named `sub_{counter}` where the counter is the number of
/// directories created so far, so names are unique across the whole tree.
/// Nesting stops at `max_depth` levels counting the top level itself.
pub fn build<R: Rng>(
    root: &Path,
    top_dirs: u32,
    fanout: u32,
    max_depth: u32,
    rng: &mut R,
) -> Result<Vec<Directory>> {
    let mut dirs: Vec<Directory> = Vec::new();

    for i in 0..top_dirs {
        let path = root.join(format!("top_{i}"));
        fs::create_dir(&path)
            .with_context(|| format!("creating directory {}", path.display()))?;
        dirs.push(Directory {
            path,
            depth: 0,
            parent: None,
        });
        let top = dirs.len() - 1;
        grow(&mut dirs, top, 1, fanout, max_depth, rng)?;
    }

    Ok(dirs)
}

fn grow<R: Rng>(
    dirs: &mut Vec<Directory>,
    parent: usize,
    depth: u32,
    fanout: u32,
    max_depth: u32,
    rng: &mut R,
) -> Result<()> {
    if depth >= max_depth {
        return Ok(());
    }
    for _ in 0..rng.gen_range(0..=fanout) {
        let path = dirs[parent].path.join(format!("sub_{}", dirs.len()));
        fs::create_dir(&path)
            .with_context(|| format!("creating directory {}", path.display()))?;
        dirs.push(Directory {
            path,
            depth,
            parent: Some(parent),
        });
        let child = dirs.len() - 1;
        grow(dirs, child, depth + 1, fanout, max_depth, rng)?;
    }
    Ok(())
}
