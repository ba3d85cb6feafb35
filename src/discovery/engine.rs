//! Sequential discovery sweep.
//!
//! Indices are visited in increasing order and each index is fully resolved
//! (accepted or exhausted) before the next one starts. Within an index the
//! extensions are tried in priority order and the first decodable candidate
//! wins. Only one probe is ever outstanding, so the resulting photo order is
//! independent of how long individual loads take.

use std::path::PathBuf;

use tracing::{debug, info, trace};

use super::candidate::{Candidate, Extension};
use super::probe::PhotoProbe;
use crate::models::{DiscoveredPhoto, PhotoSet};

/// Highest photo index probed by default.
pub const DEFAULT_MAX_INDEX: u32 = 20;

#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Inclusive upper bound of the index sweep (indices start at 1).
    pub max_index: u32,
    pub extensions: Vec<Extension>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_index: DEFAULT_MAX_INDEX,
            extensions: Extension::PRIORITY.to_vec(),
        }
    }
}

/// Summary of a finished sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Number of candidate files probed.
    pub attempts: usize,
    /// Number of photos accepted into the set.
    pub accepted: usize,
}

/// Receives discovery progress. Called synchronously from the sweep, so an
/// accepted photo is fully handled before the next candidate is probed.
pub trait DiscoverySink {
    fn photo_accepted(&mut self, set: &PhotoSet, position: usize);
    fn discovery_finished(&mut self, set: &PhotoSet);
}

impl DiscoverySink for () {
    fn photo_accepted(&mut self, _set: &PhotoSet, _position: usize) {}
    fn discovery_finished(&mut self, _set: &PhotoSet) {}
}

pub struct DiscoveryEngine<P> {
    probe: P,
    root: PathBuf,
    options: DiscoveryOptions,
}

impl<P: PhotoProbe> DiscoveryEngine<P> {
    pub fn new(probe: P, root: impl Into<PathBuf>, options: DiscoveryOptions) -> Self {
        Self {
            probe,
            root: root.into(),
            options,
        }
    }

    /// Run the full sweep, appending accepted photos to `set` and notifying
    /// `sink` as they arrive.
    pub async fn run<S: DiscoverySink>(&self, set: &PhotoSet, sink: &mut S) -> DiscoveryReport {
        debug!(root = ?self.root, max_index = self.options.max_index, "Starting photo discovery");
        let mut report = DiscoveryReport::default();

        for index in 1..=self.options.max_index {
            if let Some(photo) = self.resolve_index(index, &mut report.attempts).await {
                debug!(index, path = ?photo.path, "Accepted photo");
                let position = set.push(photo);
                report.accepted += 1;
                sink.photo_accepted(set, position);
            }
        }

        sink.discovery_finished(set);
        info!(
            accepted = report.accepted,
            attempts = report.attempts,
            "Photo discovery finished"
        );
        report
    }

    /// Run the sweep without a sink and return the finished set.
    #[cfg(test)]
    pub async fn discover(&self) -> PhotoSet {
        let set = PhotoSet::new();
        self.run(&set, &mut ()).await;
        set
    }

    /// Probe the candidates for one index; the first decodable one wins.
    async fn resolve_index(&self, index: u32, attempts: &mut usize) -> Option<DiscoveredPhoto> {
        for candidate in Candidate::for_index(&self.root, index, &self.options.extensions) {
            *attempts += 1;
            match self.probe.probe(&candidate.path).await {
                Ok(probed) => {
                    return Some(DiscoveredPhoto {
                        index: candidate.index,
                        extension: candidate.extension,
                        path: candidate.path,
                        width: probed.width,
                        height: probed.height,
                        thumbnail: probed.thumbnail,
                    });
                }
                Err(err) => {
                    trace!(path = ?candidate.path, error = %err, "Candidate rejected");
                }
            }
        }
        None
    }
}
