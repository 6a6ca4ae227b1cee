use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ProcessError;
use crate::retry::RetryPolicy;

/// Where per-page transcripts come from. The OCR backend used to live behind
/// this seam; what ships is a plain directory of page files.
pub trait PageSource {
    fn fetch(&self, page: u32) -> Result<String, ProcessError>;
}

/// Reads `page_001.txt`, `page_002.txt`, ... from a directory.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirSource { dir: dir.into() }
    }
}

impl PageSource for DirSource {
    fn fetch(&self, page: u32) -> Result<String, ProcessError> {
        let path = self.dir.join(format!("page_{:03}.txt", page));
        let text = fs::read_to_string(&path).map_err(|e| ProcessError::PageUnavailable {
            page,
            message: format!("{}: {}", path.display(), e),
        })?;
        // A near-empty transcript means the page failed upstream.
        if text.trim().chars().count() < 20 {
            return Err(ProcessError::PageUnavailable {
                page,
                message: "transcript too short".to_string(),
            });
        }
        Ok(text)
    }
}

/// One collected page: either its transcript or the terminal error.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageRecord {
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageBatch {
    pub total_pages: u32,
    pub completed_pages: usize,
    pub pages: Vec<PageRecord>,
}

impl PageBatch {
    /// Join the collected transcripts into the flat document the segmenter
    /// consumes; failed pages are simply absent.
    pub fn into_document(self) -> String {
        self.pages
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Fetch pages 1..=total sequentially through the retry policy, writing the
/// partial batch to `checkpoint` after every page so an interrupted run
/// loses at most one page. A page that exhausts its retries becomes an
/// error record; the run always continues to the end.
pub fn collect_pages(
    source: &impl PageSource,
    total: u32,
    policy: &RetryPolicy,
    checkpoint: &Path,
) -> Result<PageBatch, ProcessError> {
    let mut batch = PageBatch {
        total_pages: total,
        completed_pages: 0,
        pages: Vec::with_capacity(total as usize),
    };

    for page in 1..=total {
        let record = match policy.run(&format!("page {}", page), |_| source.fetch(page)) {
            Ok(text) => {
                info!("page {} collected ({} chars)", page, text.chars().count());
                PageRecord {
                    page,
                    text: Some(text),
                    error: None,
                }
            }
            Err(err) => {
                warn!("page {} failed terminally: {}", page, err);
                PageRecord {
                    page,
                    text: None,
                    error: Some(err.to_string()),
                }
            }
        };
        batch.pages.push(record);
        batch.completed_pages = batch.pages.len();
        fs::write(checkpoint, serde_json::to_string_pretty(&batch)?)?;
    }

    Ok(batch)
}
