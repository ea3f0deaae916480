// Mon Oct 19 2026 - Alex

use crate::pattern::{matcher, CompiledPattern, PatternError};
use memmap2::Mmap;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// A match inside one named input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanHit {
    pub source: String,
    pub offset: usize,
}

/// Outcome of scanning one file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub size: usize,
    pub hits: Vec<ScanHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs one compiled pattern over many buffers or files.
pub struct PatternScanner {
    stride: NonZeroUsize,
    use_parallel: bool,
    use_mmap: bool,
    find_all: bool,
}

impl PatternScanner {
    pub fn new() -> Self {
        Self {
            stride: NonZeroUsize::MIN,
            use_parallel: true,
            use_mmap: true,
            find_all: false,
        }
    }

    pub fn with_stride(mut self, stride: NonZeroUsize) -> Self {
        self.stride = stride;
        self
    }

    pub fn use_parallel(mut self, parallel: bool) -> Self {
        self.use_parallel = parallel;
        self
    }

    pub fn use_mmap(mut self, mmap: bool) -> Self {
        self.use_mmap = mmap;
        self
    }

    pub fn find_all(mut self, all: bool) -> Self {
        self.find_all = all;
        self
    }

    pub fn scan(&self, pattern: &CompiledPattern, data: &[u8]) -> Vec<usize> {
        if self.find_all {
            matcher::find_all(data, pattern, self.stride)
        } else {
            matcher::find_strided(data, pattern, self.stride)
                .into_iter()
                .collect()
        }
    }

    pub fn scan_buffers(&self, pattern: &CompiledPattern, buffers: &[(&str, &[u8])]) -> Vec<ScanHit> {
        let scan_one = |&(name, data): &(&str, &[u8])| {
            log::trace!("scanning {} ({} bytes)", name, data.len());
            self.scan(pattern, data)
                .into_iter()
                .map(|offset| ScanHit {
                    source: name.to_string(),
                    offset,
                })
                .collect::<Vec<_>>()
        };

        if self.use_parallel {
            buffers.par_iter().flat_map_iter(scan_one).collect()
        } else {
            buffers.iter().flat_map(scan_one).collect()
        }
    }

    pub fn scan_file(&self, pattern: &CompiledPattern, path: &Path) -> Result<(usize, Vec<usize>), PatternError> {
        let file = File::open(path)?;

        if self.use_mmap && file.metadata()?.len() > 0 {
            let mmap = unsafe { Mmap::map(&file) }?;
            Ok((mmap.len(), self.scan(pattern, &mmap)))
        } else {
            let data = std::fs::read(path)?;
            Ok((data.len(), self.scan(pattern, &data)))
        }
    }

    /// Scans every path; a file that cannot be read is reported, not fatal.
    pub fn scan_files(&self, pattern: &CompiledPattern, paths: &[PathBuf]) -> Vec<FileReport> {
        self.scan_files_with(pattern, paths, |_| {})
    }

    /// Like [`scan_files`](Self::scan_files), calling `on_done` as each file finishes.
    pub fn scan_files_with<F>(&self, pattern: &CompiledPattern, paths: &[PathBuf], on_done: F) -> Vec<FileReport>
    where
        F: Fn(&FileReport) + Sync,
    {
        let scan_one = |path: &PathBuf| {
            let source = path.display().to_string();
            let report = match self.scan_file(pattern, path) {
                Ok((size, offsets)) => FileReport {
                    path: path.clone(),
                    size,
                    hits: offsets
                        .into_iter()
                        .map(|offset| ScanHit {
                            source: source.clone(),
                            offset,
                        })
                        .collect(),
                    error: None,
                },
                Err(e) => {
                    log::warn!("failed to scan {}: {}", source, e);
                    FileReport {
                        path: path.clone(),
                        size: 0,
                        hits: Vec::new(),
                        error: Some(e.to_string()),
                    }
                }
            };
            on_done(&report);
            report
        };

        if self.use_parallel {
            paths.par_iter().map(scan_one).collect()
        } else {
            paths.iter().map(scan_one).collect()
        }
    }
}

impl Default for PatternScanner {
    fn default() -> Self {
        Self::new()
    }
}
