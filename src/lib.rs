use lazy_static::lazy_static;
use tera::Tera;

pub use crate::error::{Result, SvsError};

pub mod cli;
pub mod config;
pub mod error;
pub mod job;
pub mod netlist;
pub mod paths;
pub mod plan;
pub mod process;
pub mod runset;
pub mod verification;

lazy_static! {
    pub static ref TEMPLATES: Tera = {
        let mut tera = Tera::default();
        if let Err(e) = tera.add_raw_templates(vec![
            ("si.env", include_str!("../templates/si.env")),
            ("calibre.runset", include_str!("../templates/calibre.runset")),
        ]) {
            panic!("Error parsing templates: {e}");
        }
        tera
    };
}

#[cfg(test)]
pub(crate) mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use crate::paths::{CALIBRE_DIR, CDL_DIR, STRMINOUT_DIR};

    /// A scratch work directory laid out the way an `svs` user's run
    /// directory is expected to look.
    pub(crate) fn test_work_dir() -> TempDir {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        for sub in [CDL_DIR, STRMINOUT_DIR, CALIBRE_DIR] {
            fs::create_dir_all(dir.path().join(sub)).expect("failed to create subdirectory");
        }
        dir
    }

    pub(crate) fn read(path: impl AsRef<Path>) -> String {
        fs::read_to_string(path).expect("failed to read file")
    }

    #[test]
    fn test_templates_are_embedded() {
        let mut names: Vec<&str> = crate::TEMPLATES.get_template_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["calibre.runset", "si.env"]);
    }
}
