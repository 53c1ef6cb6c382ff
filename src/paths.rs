use std::path::{Path, PathBuf};

use crate::job::CheckType;

pub const CDL_DIR: &str = "CDL";
pub const STRMINOUT_DIR: &str = "STRMINOUT";
pub const CALIBRE_DIR: &str = "CALIBRE";

pub const SI_ENV_FILE: &str = "si.env";
pub const FXOR_SUMMARY_FILE: &str = "rules.fxor.summary";

/// Directory into which extracted netlists or stream files are collected.
pub fn out_dir(work_dir: impl AsRef<Path>, check_type: CheckType) -> PathBuf {
    let sub = match check_type {
        CheckType::Schematic => CDL_DIR,
        CheckType::Layout => STRMINOUT_DIR,
    };
    PathBuf::from(work_dir.as_ref()).join(sub)
}

pub fn calibre_dir(work_dir: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(work_dir.as_ref()).join(CALIBRE_DIR)
}

pub fn si_env(work_dir: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(work_dir.as_ref()).join(SI_ENV_FILE)
}

pub fn cdl_name(lib: &str, cell: &str) -> String {
    format!("{lib}__{cell}.cdl")
}

pub fn gds_name(lib: &str, cell: &str) -> String {
    format!("{lib}__{cell}.gds")
}

pub fn out_runset(work_dir: impl AsRef<Path>, check_type: CheckType) -> PathBuf {
    calibre_dir(work_dir).join(format!("{check_type}.runset"))
}

pub fn out_lvs_report(work_dir: impl AsRef<Path>, top: &str) -> PathBuf {
    calibre_dir(work_dir).join(format!("{top}.lvs.report"))
}

pub fn out_fxor_summary(work_dir: impl AsRef<Path>) -> PathBuf {
    calibre_dir(work_dir).join(FXOR_SUMMARY_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runset_names() {
        assert_eq!(
            out_runset("/work", CheckType::Schematic),
            PathBuf::from("/work/CALIBRE/svs.runset")
        );
        assert_eq!(
            out_runset("/work", CheckType::Layout),
            PathBuf::from("/work/CALIBRE/lvl.runset")
        );
    }

    #[test]
    fn test_output_names() {
        assert_eq!(cdl_name("libA", "cellX"), "libA__cellX.cdl");
        assert_eq!(gds_name("libA", "cellX"), "libA__cellX.gds");
        assert_eq!(
            out_dir("/work", CheckType::Layout),
            PathBuf::from("/work/STRMINOUT")
        );
    }
}
