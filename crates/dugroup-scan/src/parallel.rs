//! JWalk-based parallel walker.
//!
//! Directory reads are fanned out to a rayon pool by jwalk; every entry is
//! folded into the single [`ScanState`] on the calling thread, so totals stay
//! exact without locking. Progress notifications arrive in jwalk's yield
//! order, which is not guaranteed to match the sequential walk.

use std::path::Path;

use jwalk::{Parallelism, WalkDir};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use dugroup_core::{EntryMeta, ScanError, ScanWarning, WarningKind};

use crate::observer::ScanObserver;
use crate::scanner::report;
use crate::state::ScanState;

pub(crate) fn walk<O>(
    root: &Path,
    threads: usize,
    state: &mut ScanState,
    observer: &mut O,
    cancel: &CancellationToken,
) -> Result<(), ScanError>
where
    O: ScanObserver + ?Sized,
{
    if cancel.is_cancelled() {
        return Err(ScanError::Interrupted);
    }
    observer.on_progress(root, state.aggregates());

    let walker = WalkDir::new(root)
        .parallelism(Parallelism::RayonNewPool(threads))
        .skip_hidden(false)
        .follow_links(false)
        .sort(false);

    for entry_result in walker {
        if cancel.is_cancelled() {
            return Err(ScanError::Interrupted);
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                report(observer, listing_warning(&path, &err));
                continue;
            }
        };

        let path = entry.path();

        // A failed listing is carried on the directory's own entry.
        if let Some(err) = &entry.read_children_error {
            report(observer, listing_warning(&path, err));
        }

        // Depth 0 is the root, which is never recorded.
        if entry.depth == 0 {
            continue;
        }

        if entry.file_type().is_symlink() {
            trace!(path = %path.display(), "skipping symlink");
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(err) => {
                let warning = match err.io_error() {
                    Some(io) => ScanWarning::metadata_error(&path, io),
                    None => ScanWarning::new(&path, err.to_string(), WarningKind::MetadataError),
                };
                report(observer, warning);
                continue;
            }
        };

        let meta = EntryMeta::from(&metadata);
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        state.reset_to(relative);
        state.record(&meta);

        if meta.is_dir() {
            observer.on_progress(&path, state.aggregates());
        }
    }

    Ok(())
}

fn listing_warning(path: &Path, err: &jwalk::Error) -> ScanWarning {
    match err.io_error() {
        Some(io) => ScanWarning::read_error(path, io),
        None => ScanWarning::new(path, err.to_string(), WarningKind::ReadError),
    }
}
