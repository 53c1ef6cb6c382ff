use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::job::{CheckType, JobSpec};

/// First positional token that selects layout-vs-layout comparison.
pub const LVL_FLAG: &str = "lvl";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Generates CDL netlists for the schematic views of the given cell in both \
                  libraries and runs Calibre SVS to compare them. Netlists are saved in \
                  WORK_DIR/CDL and the LVS report in WORK_DIR/CALIBRE.\n\n\
                  If the first argument is `lvl`, both layouts are streamed out to \
                  WORK_DIR/STRMINOUT and compared with a Calibre FASTXOR run instead.",
    override_usage = "svs [lvl] <LIB1> <LIB2> <CELL> [OPTIONS]",
    help_template(
        "{before-help}{name} {version}\n{author-with-newline}{about-with-newline}\n{usage-heading} {usage}\n\n{all-args}{after-help}"
    )
)]
pub struct Args {
    /// `[lvl] LIB1 LIB2 CELL`.
    #[arg(value_name = "ARGS")]
    pub positional: Vec<String>,

    /// Views to extract from LIB1 and LIB2, respectively.
    #[arg(long, num_args = 2, value_names = ["VIEW1", "VIEW2"])]
    pub views: Option<Vec<String>>,

    /// Path to TOML configuration file. Defaults to `svs.toml` in the work directory, if present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory containing the CDL, STRMINOUT and CALIBRE directories.
    /// Defaults to the current directory.
    #[arg(short = 'C', long)]
    pub work_dir: Option<PathBuf>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct UsageError(pub String);

impl Args {
    /// Resolves the positional tokens and `--views` into a [`JobSpec`].
    ///
    /// Three tokens always describe an SVS run. With four tokens, the first
    /// must be `lvl`.
    pub fn job(&self) -> Result<JobSpec, UsageError> {
        let job = match self.positional.as_slice() {
            [lib1, lib2, cell] => JobSpec::new(CheckType::Schematic, lib1, lib2, cell),
            [flag, lib1, lib2, cell] if flag == LVL_FLAG => {
                JobSpec::new(CheckType::Layout, lib1, lib2, cell)
            }
            [flag, ..] if self.positional.len() == 4 => {
                return Err(UsageError(format!(
                    "unexpected argument `{flag}`; expected `{LVL_FLAG}` or 3 arguments"
                )))
            }
            tokens => {
                return Err(UsageError(format!(
                    "expected 3 or 4 arguments, got {}",
                    tokens.len()
                )))
            }
        };

        match self.views.as_deref() {
            None => Ok(job),
            Some([view1, view2]) => Ok(job.with_views(view1, view2)),
            Some(_) => Err(UsageError("--views requires exactly 2 views".to_string())),
        }
    }
}
