use std::path::{Path, PathBuf};

/// File extensions tried for each index, in priority order.
///
/// `Bare` is the extensionless `photo{index}` file; its format is sniffed
/// from content when probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    Jpeg,
    Jpg,
    Png,
    Webp,
    Bare,
}

impl Extension {
    pub const PRIORITY: [Extension; 5] = [
        Extension::Jpeg,
        Extension::Jpg,
        Extension::Png,
        Extension::Webp,
        Extension::Bare,
    ];

    pub fn suffix(self) -> Option<&'static str> {
        match self {
            Extension::Jpeg => Some("jpeg"),
            Extension::Jpg => Some("jpg"),
            Extension::Png => Some("png"),
            Extension::Webp => Some("webp"),
            Extension::Bare => None,
        }
    }
}

/// File name for a numbered candidate, e.g. `photo3.png` or `photo3`.
pub fn candidate_name(index: u32, extension: Extension) -> String {
    match extension.suffix() {
        Some(suffix) => format!("photo{index}.{suffix}"),
        None => format!("photo{index}"),
    }
}

/// One (index, extension) combination to test for existence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub index: u32,
    pub extension: Extension,
    pub path: PathBuf,
}

impl Candidate {
    pub fn new(root: &Path, index: u32, extension: Extension) -> Self {
        Self {
            index,
            extension,
            path: root.join(candidate_name(index, extension)),
        }
    }

    /// All candidates for one index, in the order they must be probed.
    pub fn for_index<'a>(
        root: &'a Path,
        index: u32,
        extensions: &'a [Extension],
    ) -> impl Iterator<Item = Candidate> + 'a {
        extensions
            .iter()
            .map(move |&extension| Candidate::new(root, index, extension))
    }
}
