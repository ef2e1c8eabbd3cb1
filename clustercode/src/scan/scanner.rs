use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, trace};

use super::{CandidateMap, ScanService, marker_path};
use crate::config::ScanConfig;
use crate::domain::{MediaCandidate, PriorityLane};
use crate::fs::FileSystem;
use crate::utils::filename::extension_lowercase;
use crate::{Error, Result};

/// Scans `base_input_dir` for numeric lane directories and their media files.
pub struct PriorityScanner {
    fs: Arc<dyn FileSystem>,
    config: ScanConfig,
}

impl PriorityScanner {
    pub fn new(fs: Arc<dyn FileSystem>, config: ScanConfig) -> Self {
        Self { fs, config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Immediate children of the input root that are lane directories.
    fn discover_lanes(&self) -> Result<Vec<PriorityLane>> {
        let root = &self.config.base_input_dir;
        let entries = self.fs.read_dir(root).map_err(|e| Error::read(root, e))?;

        let mut lanes = Vec::new();
        for entry in entries {
            let lane = entry
                .is_dir()
                .then(|| entry.file_name())
                .flatten()
                .and_then(|name| PriorityLane::parse(name, &entry.path));
            match lane {
                Some(lane) => lanes.push(lane),
                None => debug!(path = %entry.path.display(), "Ignoring non-lane entry"),
            }
        }
        Ok(lanes)
    }

    /// Eligible candidates of one lane, sorted by relative path.
    fn scan_lane(&self, lane: &PriorityLane) -> Result<Vec<MediaCandidate>> {
        let root = &self.config.base_input_dir;
        let files = self
            .fs
            .walk_files(lane.path())
            .map_err(|e| Error::read(lane.path(), e))?;

        let mut candidates = Vec::new();
        for file in files {
            if !self.is_eligible(&file) {
                continue;
            }
            let relative = file.strip_prefix(root).map_err(|_| {
                Error::InvalidCandidatePath(format!(
                    "{} is outside of {}",
                    file.display(),
                    root.display()
                ))
            })?;
            candidates.push(MediaCandidate::new(relative, lane.priority())?);
        }
        candidates.sort_by(|a, b| a.relative_path().cmp(b.relative_path()));
        Ok(candidates)
    }

    fn is_eligible(&self, file: &Path) -> bool {
        let skip = &self.config.skip_extension;
        match extension_lowercase(file) {
            Some(ext) if self.config.is_allowed(&ext) => {}
            _ => {
                trace!(path = %file.display(), "Skipping file with unlisted extension");
                return false;
            }
        }
        if self.fs.exists(&marker_path(file, skip)) {
            trace!(path = %file.display(), "Skipping completed file");
            return false;
        }
        true
    }
}

impl ScanService for PriorityScanner {
    fn retrieve_files(&self) -> Result<CandidateMap> {
        debug!(root = %self.config.base_input_dir.display(), "Scanning input directory");

        let mut result = BTreeMap::new();
        for lane in self.discover_lanes()? {
            let candidates = self.scan_lane(&lane)?;
            debug!(
                priority = lane.priority(),
                candidates = candidates.len(),
                "Scanned lane"
            );
            result.insert(lane, candidates);
        }

        let total: usize = result.values().map(Vec::len).sum();
        info!(lanes = result.len(), candidates = total, "Scan finished");
        Ok(result)
    }
}
