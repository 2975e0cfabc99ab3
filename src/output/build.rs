use crate::{
    config::PortfolioConfig,
    error::{Error, Result},
    output::Output,
    util::{progress_bar, recursively_remove_empty_dirs_of_contents},
};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::{fs, path::Path, time::Instant};
use wax::Glob;

/// Writes `output` below `config.output`, removing files that are no longer
/// generated.
pub fn build(start: Instant, config: &PortfolioConfig, output: &Output<'_>) -> Result<()> {
    let root = Path::new(&config.output);
    fs::create_dir_all(root).map_err(|e| Error::io(root, e))?;

    let removals = remove_obsolete(root, output)?;

    let progress = progress_bar("Saving website...", output.len(), start);

    output.par_iter().try_for_each(|(path, generator)| {
        let path = config.subdirectory(path.trim_start_matches('/'));
        let contents = &**generator;
        if let Some(dir) = Path::new(&path).parent() {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        let unchanged = fs::read(&path).is_ok_and(|old| old == *contents);
        if !unchanged {
            fs::write(&path, contents).map_err(|e| Error::io(&path, e))?;
        }
        progress.inc(1);
        Ok::<_, Error>(())
    })?;

    progress.finish_and_clear();

    tracing::info!(
        "({:.1}s) Saved website to {}, removed {removals} obsolete files",
        start.elapsed().as_secs_f32(),
        config.output,
    );
    Ok(())
}

fn remove_obsolete(root: &Path, output: &Output<'_>) -> Result<usize> {
    let walk_error = |message: String| Error::Walk {
        path: root.to_owned(),
        message,
    };
    let mut removals = 0usize;
    for file in Glob::new("**")
        .map_err(|e| walk_error(e.to_string()))?
        .walk(root)
    {
        let file = file.map_err(|e| walk_error(e.to_string()))?;
        if !file.file_type().is_file() {
            continue;
        }
        let path = format!("/{}", file.matched().complete());
        if !output.contains_key(&path) {
            tracing::debug!("removing obsolete {path}");
            fs::remove_file(file.path()).map_err(|e| Error::io(file.path(), e))?;
            removals += 1;
        }
    }
    recursively_remove_empty_dirs_of_contents(root).map_err(|e| Error::io(root, e))?;
    Ok(removals)
}
