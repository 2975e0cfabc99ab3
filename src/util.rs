use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use indicatif::ProgressBar;
use indicatif::ProgressStyle;

pub fn recursively_remove_empty_dirs_of_contents<P: AsRef<Path>>(path: P) -> io::Result<()> {
    fn recursively_remove_empty_dirs<P: AsRef<Path>>(path: P) -> io::Result<bool> {
        let mut keep = false;
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            let path = entry.path();

            if entry.file_type()?.is_dir() {
                keep |= recursively_remove_empty_dirs(path)?;
            } else {
                keep = true;
            }
        }
        if !keep {
            fs::remove_dir(&path)?;
        }
        Ok(keep)
    }

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_dir() {
            recursively_remove_empty_dirs(path)?;
        }
    }
    Ok(())
}

// TODO: wait for `slice_concat_ext` stabilization.
pub fn join<T: Clone>(slice: &[T], sep: &T) -> Vec<T> {
    let mut iter = slice.iter();
    let first = match iter.next() {
        Some(first) => first,
        None => return vec![],
    };
    let size = slice.len() * 2 - 1;
    let mut result = Vec::with_capacity(size);
    result.extend_from_slice(std::slice::from_ref(first));

    for v in iter {
        result.push(sep.clone());
        result.extend_from_slice(std::slice::from_ref(v))
    }
    result
}

pub fn progress_bar(name: &str, count: usize, start: Instant) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template("{msg} {wide_bar} {pos}/{len} {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(count as u64)
        .with_message(name.to_owned())
        .with_style(style)
        .with_elapsed(start.elapsed())
}

pub fn content_type(path: &str) -> &'static str {
    let extension = path
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        // Help Chrome
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
