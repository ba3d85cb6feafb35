//! Empirical photo discovery.
//!
//! There is no manifest: photos are found by trying numbered candidate files
//! (`photo1.jpeg`, `photo1.jpg`, ... `photo20`) in a fixed order and keeping
//! whatever decodes.

pub mod candidate;
pub mod engine;
pub mod probe;

pub use candidate::{candidate_name, Candidate, Extension};
pub use engine::{DiscoveryEngine, DiscoveryOptions, DiscoveryReport, DiscoverySink};
pub use probe::{FsProbe, PhotoProbe, ProbedImage};
