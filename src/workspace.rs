//! Workspace scanning: finding catalog files and summarizing them in parallel.

use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;
use rayon::prelude::*;
use thiserror::Error;

use crate::config::CatalogMatcher;
use crate::error::CatalogError;
use crate::input::load_catalog;
use crate::stats::CatalogStats;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Error when a catalog file could not be read or parsed
    #[error("{path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
    /// Error when the worker pool could not be started
    #[error("Failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Summary of one catalog file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub path: PathBuf,
    pub language: String,
    pub stats: CatalogStats,
}

/// カタログファイルを検索
///
/// `.gitignore` を尊重しながらワークスペースを走査し、
/// include パターンに一致し exclude パターンに一致しないファイルを返す。
#[must_use]
pub fn find_catalog_files(matcher: &CatalogMatcher) -> Vec<PathBuf> {
    let workspace_path = matcher.workspace_root();
    tracing::debug!(workspace_path = %workspace_path.display(), "Scanning workspace for catalogs");

    let mut found_files = Vec::new();
    // ignore クレートでファイルを走査
    for result in WalkBuilder::new(workspace_path)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        // ファイルのみを対象
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        // workspace からの相対パスを取得
        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(workspace_path) else {
            continue;
        };
        if !matcher.is_catalog_file_relative(relative_path) {
            continue;
        }

        found_files.push(path.to_path_buf());
    }

    found_files.sort();
    tracing::debug!(count = found_files.len(), "Catalog files found");
    found_files
}

/// 複数のカタログを並列に読み込み、統計を集計する
///
/// 各ファイルは独立して処理され、結果は `files` と同じ順序で返る。
/// 読み込みに失敗したファイルはエラーとして個別に返される。
///
/// # Errors
/// ワーカースレッドの起動に失敗した場合
pub fn collect_stats(
    files: &[PathBuf],
    num_threads: usize,
) -> Result<Vec<Result<FileStats, WorkspaceError>>, WorkspaceError> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(num_threads.max(1)).build()?;
    tracing::debug!(files = files.len(), num_threads, "Collecting catalog statistics");

    Ok(pool.install(|| files.par_iter().map(|path| file_stats(path)).collect()))
}

/// 単一ファイルの統計を取得
fn file_stats(path: &Path) -> Result<FileStats, WorkspaceError> {
    let catalog = load_catalog(path).map_err(|source| {
        tracing::warn!(path = %path.display(), "Skipping catalog: {source}");
        WorkspaceError::Catalog { path: path.to_path_buf(), source }
    })?;

    Ok(FileStats {
        path: path.to_path_buf(),
        language: catalog.language.clone(),
        stats: CatalogStats::compute(&catalog),
    })
}
