use std::path::Path;

use serde::{Deserialize, Serialize};
use tmerge_doc::WriteOptions;
use tmerge_merge::trx::DEFAULT_RUN_ELEMENT;

use crate::error::{DriverError, DriverResult};
use crate::format::Format;

/// Configuration for a merge session, usually read from a TOML file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// File names written into the output directory.
    pub outputs: OutputNames,
    pub trx: TrxConfig,
    pub writer: WriterConfig,
}

impl MergeConfig {
    pub fn from_toml_str(text: &str) -> DriverResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> DriverResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DriverError::io(path, e))?;
        Self::from_toml_str(&text)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputNames {
    pub nunit_xml: String,
    pub nunit_text: String,
    pub trx: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            nunit_xml: "TestResult.xml".into(),
            nunit_text: "TestResult.txt".into(),
            trx: "TestResult.trx".into(),
        }
    }
}

impl OutputNames {
    pub fn for_format(&self, format: Format) -> &str {
        match format {
            Format::NUnitXml => &self.nunit_xml,
            Format::NUnitText => &self.nunit_text,
            Format::Trx => &self.trx,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrxConfig {
    /// Tag of the run-level element whose children are merged.
    pub run_element: String,
}

impl Default for TrxConfig {
    fn default() -> Self {
        Self {
            run_element: DEFAULT_RUN_ELEMENT.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Indentation width; compact output when unset.
    pub indent: Option<usize>,
}

impl WriterConfig {
    pub fn write_options(&self) -> WriteOptions {
        match self.indent {
            Some(width) => WriteOptions::indented(width),
            None => WriteOptions::compact(),
        }
    }
}
