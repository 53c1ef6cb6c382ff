use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;

/// Name of the configuration file picked up from the work directory
/// when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "svs.toml";

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvsConfig {
    pub tools: ToolsConfig,
    pub rules: RulesConfig,
    pub stream: StreamConfig,
}

/// Executables invoked by the flow.
///
/// Bare names are resolved through `PATH`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub si: PathBuf,
    pub strmout: PathBuf,
    pub calibre: PathBuf,
}

/// Technology files referenced by the generated `si.env`, stream-out command
/// and runsets. Written verbatim.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Calibre LVS rule deck used for SVS.
    pub lvs_rules_file: String,
    /// Calibre FASTXOR rule deck used for LVL.
    pub xor_rules_file: String,
    /// CDL include file passed to the auCdl netlister.
    pub include_file: String,
    pub tech_lib: String,
    pub skill_file: String,
    pub object_map_file: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub max_vertices: u32,
    pub log_file: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            si: PathBuf::from("si"),
            strmout: PathBuf::from("strmout"),
            calibre: PathBuf::from("calibre"),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            lvs_rules_file: "rules/calibre.lvs".to_string(),
            xor_rules_file: "rules/calibre.fxor".to_string(),
            include_file: "rules/source.added".to_string(),
            tech_lib: "techLib".to_string(),
            skill_file: "rules/strmout.il".to_string(),
            object_map_file: "rules/strmout.map".to_string(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_vertices: 199,
            log_file: "strmOut.log".to_string(),
        }
    }
}

pub fn parse_svs_config(path: impl AsRef<Path>) -> Result<SvsConfig> {
    let contents = fs::read_to_string(path)?;
    let data = toml::from_str(&contents)?;
    Ok(data)
}

/// Loads `path` if given, else `svs.toml` in `work_dir` if it exists,
/// else the built-in defaults.
pub fn load_svs_config(path: Option<&Path>, work_dir: impl AsRef<Path>) -> Result<SvsConfig> {
    if let Some(path) = path {
        return parse_svs_config(path);
    }
    let fallback = work_dir.as_ref().join(DEFAULT_CONFIG_FILE);
    if fallback.is_file() {
        log::info!("using configuration file {:?}", &fallback);
        parse_svs_config(fallback)
    } else {
        log::debug!("no configuration file found, using defaults");
        Ok(SvsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() -> anyhow::Result<()> {
        let cfg: SvsConfig = toml::from_str(
            r#"
            [tools]
            calibre = "/tools/mentor/bin/calibre"

            [rules]
            lvs_rules_file = "/pdk/lvs.rul"
            "#,
        )?;
        assert_eq!(cfg.tools.calibre, PathBuf::from("/tools/mentor/bin/calibre"));
        assert_eq!(cfg.tools.si, PathBuf::from("si"));
        assert_eq!(cfg.rules.lvs_rules_file, "/pdk/lvs.rul");
        assert_eq!(cfg.rules.tech_lib, RulesConfig::default().tech_lib);
        assert_eq!(cfg.stream.max_vertices, 199);
        Ok(())
    }

    #[test]
    fn test_example_config() -> anyhow::Result<()> {
        let cfg = parse_svs_config(concat!(env!("CARGO_MANIFEST_DIR"), "/svs.example.toml"))?;
        assert_eq!(cfg.tools, ToolsConfig::default());
        assert_eq!(cfg.stream, StreamConfig::default());
        assert!(cfg.rules.lvs_rules_file.ends_with("calibre_lvs.rul"));
        Ok(())
    }

    #[test]
    fn test_load_fallback() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        assert_eq!(load_svs_config(None, dir.path())?, SvsConfig::default());

        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[stream]\nmax_vertices = 4000\n",
        )?;
        assert_eq!(load_svs_config(None, dir.path())?.stream.max_vertices, 4000);
        Ok(())
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_svs_config(Some(missing.as_path()), dir.path()).is_err());
    }
}
