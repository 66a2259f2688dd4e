//! Parallel File Rendering
//!
//! One job per file on a fixed-size [`WorkerPool`]. Jobs only read the
//! shared mapping and options; each pushes its rendered file into a single
//! mutex-guarded collection. The collection comes back unordered.

use super::schema::{render_file, FileExport};
use crate::mapping::CoverageMapping;
use crate::options::ExportOptions;
use crate::pool::{available_threads, WorkerPool};
use crate::result::{ExportError, ExportResult};
use crate::summary::FileCoverageSummary;
use std::sync::{Mutex, PoisonError};

/// Worker count for rendering `file_count` files
///
/// A configured count of 0 means "hardware threads, but no more than there
/// are files". Any other configured count is used as is.
#[must_use]
pub fn effective_threads(configured: usize, file_count: usize) -> usize {
    if configured != 0 {
        return configured;
    }
    available_threads().clamp(1, file_count.max(1))
}

/// Render every file concurrently
///
/// `files` and `summaries` are paired by index. Blocks until every job has
/// finished.
///
/// # Errors
///
/// Returns error if the lists differ in length or any file fails to render
pub fn render_files<M>(
    mapping: &M,
    files: &[String],
    summaries: &[FileCoverageSummary],
    options: &ExportOptions,
) -> ExportResult<Vec<FileExport>>
where
    M: CoverageMapping + ?Sized,
{
    if files.len() != summaries.len() {
        return Err(ExportError::SummaryMismatch {
            files: files.len(),
            summaries: summaries.len(),
        });
    }

    let threads = effective_threads(options.num_threads, files.len());
    tracing::debug!(threads, files = files.len(), "rendering files");

    let rendered = Mutex::new(Vec::with_capacity(files.len()));
    let failure: Mutex<Option<ExportError>> = Mutex::new(None);

    WorkerPool::new(threads).run(|queue| {
        for (filename, summary) in files.iter().zip(summaries) {
            let (rendered, failure) = (&rendered, &failure);
            queue.submit(move || match render_file(mapping, filename, summary, options) {
                Ok(file) => {
                    tracing::trace!(filename = %file.filename, "rendered file");
                    rendered
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(file);
                }
                Err(err) => {
                    let mut slot = failure.lock().unwrap_or_else(PoisonError::into_inner);
                    if slot.is_none() {
                        *slot = Some(err);
                    }
                }
            });
        }
    });

    if let Some(err) = failure.into_inner().unwrap_or_else(PoisonError::into_inner) {
        return Err(err);
    }
    Ok(rendered.into_inner().unwrap_or_else(PoisonError::into_inner))
}
