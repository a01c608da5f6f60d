//! Report formats recognised by file extension.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tmerge_merge::Dialect;

/// One output bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Format {
    /// NUnit 2.x XML report (`.xml`).
    NUnitXml,
    /// Console output captured next to an NUnit run (`.txt`).
    NUnitText,
    /// Visual Studio TRX log (`.trx`).
    Trx,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::NUnitText, Format::NUnitXml, Format::Trx];

    /// Classify `path` by its extension, ASCII case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::NUnitXml => "xml",
            Format::NUnitText => "txt",
            Format::Trx => "trx",
        }
    }

    /// Tree dialect used to merge this format; `None` for plain text.
    pub fn dialect(self) -> Option<Dialect> {
        match self {
            Format::NUnitXml => Some(Dialect::NUnit),
            Format::NUnitText => None,
            Format::Trx => Some(Dialect::Trx),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::NUnitXml => "nunit-xml",
            Format::NUnitText => "nunit-text",
            Format::Trx => "trx",
        };
        f.pad(name)
    }
}
