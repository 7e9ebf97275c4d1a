//! Skippable batch scans.
//!
//! Directory and package scans produce one `Result<Item, SkipReason>` per
//! candidate. A skip is not a failure of the scan; [`collect_skipping`]
//! keeps the items and leaves a debug trace for every skipped candidate.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// Why a scan candidate produced no item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("{} is not a directory", path.display())]
    MissingDirectory { path: PathBuf },

    #[error("{} has no platformio.ini", path.display())]
    NotAProject { path: PathBuf },

    #[error("{} could not be loaded: {reason}", path.display())]
    Unloadable { path: PathBuf, reason: String },

    #[error("package {package} ships no valid example")]
    NoExamples { package: String },

    #[error("manifest of {package} is unavailable: {reason}")]
    ManifestUnavailable { package: String, reason: String },
}

/// Keep successful items in order, logging every skip at debug level.
pub fn collect_skipping<T, I>(results: I) -> Vec<T>
where
    I: IntoIterator<Item = Result<T, SkipReason>>,
{
    results
        .into_iter()
        .filter_map(|result| match result {
            Ok(item) => Some(item),
            Err(reason) => {
                debug!(%reason, "Skipped");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_items_in_order() {
        let results = vec![
            Ok(1),
            Err(SkipReason::MissingDirectory { path: "/x".into() }),
            Ok(3),
        ];
        assert_eq!(collect_skipping(results), vec![1, 3]);
    }
}
