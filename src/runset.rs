//! Calibre Interactive runset generation.
//!
//! A runset is a flat list of `*option: value` lines. Values are written
//! verbatim; Calibre does not support quoting.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::Context;

use crate::config::SvsConfig;
use crate::job::{CheckType, JobSpec};
use crate::netlist::NetlistResult;
use crate::paths::{calibre_dir, out_runset};
use crate::{Result, TEMPLATES};

const SLAVE_HOSTS: &str = "{use {}} {hostName {}} {cpuCount {}} {a32a64 {}} {rsh {}} {maxMem {}} {workingDir {}} {layerDir {}} {mgcLibPath {}} {launchName {}}";
const SLAVE_TBL: &str = "{use 1} {totalCpus 1} {minCpus 1} {architecture {{}}} {minMemory {{}}} {resourceOptions {{}}} {submitOptions {{}}}";

/// Everything about a finished extraction that ends up in a runset.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RunsetData {
    pub top: String,
    pub libraries: [String; 2],
    pub views: [String; 2],
    pub netlists: [PathBuf; 2],
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct RunsetEntry {
    pub key: String,
    pub value: String,
}

/// An ordered set of runset options.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct RunsetConfig {
    entries: Vec<RunsetEntry>,
}

impl RunsetData {
    pub fn new(job: &JobSpec, netlists: &[NetlistResult; 2]) -> Self {
        Self {
            top: job.cell().to_string(),
            libraries: [netlists[0].library.clone(), netlists[1].library.clone()],
            views: [netlists[0].view.clone(), netlists[1].view.clone()],
            netlists: [netlists[0].path.clone(), netlists[1].path.clone()],
        }
    }
}

impl RunsetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an option. Keys are not deduplicated.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.push(RunsetEntry {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn entries(&self) -> &[RunsetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> Result<String> {
        Ok(TEMPLATES.render("calibre.runset", &Context::from_serialize(self)?)?)
    }
}

fn path_str(path: impl AsRef<Path>) -> String {
    path.as_ref().display().to_string()
}

/// Runset for a netlist-vs-netlist (SVS) comparison.
pub fn svs_runset(data: &RunsetData, work_dir: impl AsRef<Path>, config: &SvsConfig) -> RunsetConfig {
    let top = &data.top;
    let mut rs = RunsetConfig::new();
    rs.push("*lvsRulesFile", &config.rules.lvs_rules_file)
        .push("*lvsRunDir", path_str(calibre_dir(work_dir)))
        .push("*lvsLayoutPaths", format!("{top}.calibre.db"))
        .push("*lvsLayoutPrimary", top)
        .push("*lvsLayoutLibrary", &data.libraries[0])
        .push("*lvsLayoutView", "layout")
        .push("*lvsLayoutGetFromViewer", "1")
        .push("*lvsSourcePath", path_str(&data.netlists[0]))
        .push("*lvsSourcePrimary", top)
        .push("*lvsSourceLibrary", &data.libraries[0])
        .push("*lvsSourceView", &data.views[0])
        .push("*lvsSourceLibrary2", &data.libraries[1])
        .push("*lvsSourceView2", &data.views[1])
        .push("*lvsRunWhat", "NVN")
        .push("*lvsSpiceFile", path_str(&data.netlists[1]))
        .push("*lvsAutoMatch", "1")
        .push("*lvsPlacementMatch", "1")
        .push("*lvsRecognizeGates", "NONE")
        .push("*lvsReduceSplitGates", "0")
        .push("*lvsReduceParallelMOS", "0")
        .push("*lvsERCDatabase", format!("{top}.erc.results"))
        .push("*lvsERCSummaryFile", format!("{top}.erc.summary"))
        .push("*lvsReportFile", format!("{top}.lvs.report"))
        .push("*lvsReportMaximumAll", "1")
        .push("*cmnShowOptions", "1")
        .push("*cmnSlaveHosts", SLAVE_HOSTS)
        .push("*cmnLSFSlaveTbl", SLAVE_TBL)
        .push("*cmnGridSlaveTbl", SLAVE_TBL)
        .push("*cmnFDILayoutLibrary", &data.libraries[0])
        .push("*cmnFDILayoutView", "layout")
        .push("*cmnFDIDEFLayoutPath", format!("{top}.def"));
    rs
}

/// Runset for a layout-vs-layout (LVL) FASTXOR comparison.
pub fn lvl_runset(data: &RunsetData, work_dir: impl AsRef<Path>, config: &SvsConfig) -> RunsetConfig {
    let top = &data.top;
    let mut rs = RunsetConfig::new();
    rs.push("*drcRulesFile", &config.rules.xor_rules_file)
        .push("*drcRunDir", path_str(calibre_dir(work_dir)))
        .push("*drcLayoutPaths", path_str(&data.netlists[0]))
        .push("*drcLayoutPrimary", top)
        .push("*drcLayoutLibrary", &data.libraries[0])
        .push("*drcLayoutView", &data.views[0])
        .push("*drcResultsFile", format!("{top}.drc.results"))
        .push("*drcCreateXORRule", "1")
        .push("*drcLayoutPaths2", path_str(&data.netlists[1]))
        .push("*drcLayoutPrimary2", top)
        .push("*drcLayoutLibrary2", &data.libraries[1])
        .push("*drcLayoutView2", &data.views[1])
        .push("*drcSummaryFile", format!("{top}.drc.summary"))
        .push("*drcIncrDRCSlaveHosts", SLAVE_HOSTS)
        .push("*drcIncrDRCLSFSlaveTbl", SLAVE_TBL)
        .push("*drcIncrDRCGridSlaveTbl", SLAVE_TBL)
        .push("*cmnShowOptions", "1")
        .push("*cmnRunHier", "4")
        .push("*cmnSlaveHosts", SLAVE_HOSTS)
        .push("*cmnLSFSlaveTbl", SLAVE_TBL)
        .push("*cmnGridSlaveTbl", SLAVE_TBL)
        .push("*cmnFDILayoutLibrary", &data.libraries[0])
        .push("*cmnFDILayoutView", "layout")
        .push("*cmnFDIDEFLayoutPath", format!("{top}.def"));
    rs
}

pub fn generate_runset(
    data: &RunsetData,
    check_type: CheckType,
    work_dir: impl AsRef<Path>,
    config: &SvsConfig,
) -> RunsetConfig {
    match check_type {
        CheckType::Schematic => svs_runset(data, work_dir, config),
        CheckType::Layout => lvl_runset(data, work_dir, config),
    }
}

/// Writes `runset` to `path`, replacing any existing file.
pub fn save_runset(path: impl AsRef<Path>, runset: &RunsetConfig) -> Result<()> {
    let contents = runset.render()?;

    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;

    Ok(())
}

/// Generates and saves the runset for `check_type` at its conventional
/// location under `work_dir`, returning the path written.
pub fn write_runset(
    data: &RunsetData,
    check_type: CheckType,
    work_dir: impl AsRef<Path>,
    config: &SvsConfig,
) -> Result<PathBuf> {
    let work_dir = work_dir.as_ref();
    let runset = generate_runset(data, check_type, work_dir, config);
    let path = out_runset(work_dir, check_type);
    save_runset(&path, &runset)?;
    println!("Created {}\n", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::read;

    fn data() -> RunsetData {
        RunsetData {
            top: "cellX".to_string(),
            libraries: ["libA".to_string(), "libB".to_string()],
            views: ["schematic".to_string(), "schematic_v2".to_string()],
            netlists: [
                PathBuf::from("/work/CDL/libA__cellX.cdl"),
                PathBuf::from("/work/CDL/libB__cellX.cdl"),
            ],
        }
    }

    #[test]
    fn test_render_format() -> anyhow::Result<()> {
        let mut rs = RunsetConfig::new();
        rs.push("*b", "2").push("*a", "{use {}}").push("*c", "");
        assert_eq!(rs.render()?, "*b: 2\n*a: {use {}}\n*c: \n");
        assert_eq!(RunsetConfig::new().render()?, "");
        Ok(())
    }

    #[test]
    fn test_svs_runset() {
        let config = SvsConfig::default();
        let rs = svs_runset(&data(), "/work", &config);
        assert_eq!(rs.len(), 31);
        assert_eq!(rs.entries()[0].key, "*lvsRulesFile");
        assert_eq!(rs.get("*lvsRulesFile"), Some(config.rules.lvs_rules_file.as_str()));
        assert_eq!(rs.get("*lvsRunDir"), Some("/work/CALIBRE"));
        assert_eq!(rs.get("*lvsLayoutPrimary"), Some("cellX"));
        assert_eq!(rs.get("*lvsSourcePath"), Some("/work/CDL/libA__cellX.cdl"));
        assert_eq!(rs.get("*lvsSpiceFile"), Some("/work/CDL/libB__cellX.cdl"));
        assert_eq!(rs.get("*lvsSourceView2"), Some("schematic_v2"));
        assert_eq!(rs.get("*lvsReportFile"), Some("cellX.lvs.report"));
        assert_eq!(rs.get("*cmnSlaveHosts"), Some(SLAVE_HOSTS));
        assert_eq!(rs.entries().last().unwrap().key, "*cmnFDIDEFLayoutPath");
    }

    #[test]
    fn test_lvl_runset() {
        let config = SvsConfig::default();
        let rs = lvl_runset(&data(), "/work", &config);
        assert_eq!(rs.len(), 24);
        assert_eq!(rs.get("*drcRulesFile"), Some(config.rules.xor_rules_file.as_str()));
        assert_eq!(rs.get("*drcLayoutPrimary"), Some("cellX"));
        assert_eq!(rs.get("*drcLayoutPrimary2"), Some("cellX"));
        assert_eq!(rs.get("*drcLayoutLibrary2"), Some("libB"));
        assert_eq!(rs.get("*drcSummaryFile"), Some("cellX.drc.summary"));
        assert_eq!(rs.get("*cmnRunHier"), Some("4"));
        assert_eq!(rs.get("*lvsRunWhat"), None);
    }

    #[test]
    fn test_write_runset_is_idempotent() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = SvsConfig::default();

        let path = write_runset(&data(), CheckType::Schematic, dir.path(), &config)?;
        assert_eq!(path, dir.path().join("CALIBRE/svs.runset"));
        let first = read(&path);
        assert!(first.contains("*lvsLayoutPrimary: cellX\n"));

        fs::write(&path, "stale")?;
        write_runset(&data(), CheckType::Schematic, dir.path(), &config)?;
        assert_eq!(read(&path), first);
        Ok(())
    }
}
