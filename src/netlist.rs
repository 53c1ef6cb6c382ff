//! Extraction of CDL netlists and GDS stream files from Virtuoso libraries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use tera::Context;

use crate::config::SvsConfig;
use crate::job::{CheckType, Design};
use crate::paths::{cdl_name, gds_name, si_env};
use crate::process::{Executor, ToolCommand};
use crate::{Result, SvsError, TEMPLATES};

/// An extracted netlist or stream file, along with the design it came from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NetlistResult {
    pub path: PathBuf,
    pub library: String,
    pub view: String,
}

pub struct ExtractParams<'a> {
    pub design: &'a Design,
    /// Directory in which the netlister runs and `si.env` is written.
    pub work_dir: &'a Path,
    /// Directory into which the extracted file is collected.
    pub out_dir: &'a Path,
    pub check_type: CheckType,
    pub config: &'a SvsConfig,
}

#[derive(Serialize)]
struct SiEnvContext<'a> {
    lib: &'a str,
    cell: &'a str,
    view: &'a str,
    netlist_name: &'a str,
    include_file: &'a str,
}

/// Extracts a single design, returning the path of the file it produced.
///
/// Fails if `out_dir` does not exist or the external tool fails.
pub fn extract(params: &ExtractParams, executor: &impl Executor) -> Result<NetlistResult> {
    if !params.out_dir.is_dir() {
        return Err(SvsError::MissingDirectory(params.out_dir.to_owned()));
    }

    let path = match params.check_type {
        CheckType::Schematic => extract_cdl(params, executor)?,
        CheckType::Layout => extract_gds(params, executor)?,
    };

    Ok(NetlistResult {
        path,
        library: params.design.library.clone(),
        view: params.design.view.clone(),
    })
}

pub fn generate_si_env(design: &Design, config: &SvsConfig) -> Result<String> {
    let netlist_name = cdl_name(&design.library, &design.cell);
    let ctx = SiEnvContext {
        lib: &design.library,
        cell: &design.cell,
        view: &design.view,
        netlist_name: &netlist_name,
        include_file: &config.rules.include_file,
    };
    Ok(TEMPLATES.render("si.env", &Context::from_serialize(ctx)?)?)
}

pub fn save_si_env(path: impl AsRef<Path>, design: &Design, config: &SvsConfig) -> Result<()> {
    let contents = generate_si_env(design, config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// The `si` invocation.
///
/// `si` reads its parameters from `si.env` in its working directory, so the
/// file is never named on the command line.
pub fn cdl_command(work_dir: impl AsRef<Path>, config: &SvsConfig) -> ToolCommand {
    ToolCommand::new(&config.tools.si)
        .args(["-batch", "-command", "netlist"])
        .current_dir(work_dir)
}

/// The `strmout` invocation.
///
/// Runs in `work_dir` so that `strmout` picks up the user's `cds.lib`;
/// the stream file itself lands in `out_dir`.
pub fn gds_command(
    design: &Design,
    work_dir: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    config: &SvsConfig,
) -> ToolCommand {
    let strm_file = gds_name(&design.library, &design.cell);
    ToolCommand::new(&config.tools.strmout)
        .arg("-library")
        .arg(&design.library)
        .arg("-strmFile")
        .arg(strm_file)
        .arg("-techLib")
        .arg(&config.rules.tech_lib)
        .arg("-topCell")
        .arg(&design.cell)
        .arg("-view")
        .arg(&design.view)
        .arg("-logFile")
        .arg(&config.stream.log_file)
        .arg("-outputDir")
        .arg(out_dir.as_ref().display().to_string())
        .arg("-userSkillFile")
        .arg(&config.rules.skill_file)
        .arg("-objectMap")
        .arg(&config.rules.object_map_file)
        .arg("-maxVertices")
        .arg(config.stream.max_vertices.to_string())
        .current_dir(work_dir)
}

fn extract_cdl(params: &ExtractParams, executor: &impl Executor) -> Result<PathBuf> {
    let env_path = si_env(params.work_dir);
    save_si_env(&env_path, params.design, params.config)?;
    println!("Created {}", env_path.display());

    let cmd = cdl_command(params.work_dir, params.config);
    println!("{cmd}");
    executor.execute(&cmd)?;

    let name = cdl_name(&params.design.library, &params.design.cell);
    move_netlist(params.work_dir.join(&name), params.out_dir.join(&name))
}

fn extract_gds(params: &ExtractParams, executor: &impl Executor) -> Result<PathBuf> {
    let cmd = gds_command(
        params.design,
        params.work_dir,
        params.out_dir,
        params.config,
    );
    println!("{cmd}");
    executor.execute(&cmd)?;

    Ok(params
        .out_dir
        .join(gds_name(&params.design.library, &params.design.cell)))
}

/// `EXDEV` on Linux and macOS.
const EXDEV: i32 = 18;

fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(EXDEV)
}

fn move_netlist(src: PathBuf, dst: PathBuf) -> Result<PathBuf> {
    info!("moving {:?} to {:?}", &src, &dst);
    match fs::rename(&src, &dst) {
        Ok(()) => {}
        Err(e) if is_cross_device(&e) => {
            debug!("{:?} is on another filesystem, copying instead", &dst);
            copy_and_remove(&src, &dst)?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(dst)
}

/// Moves a file by copying it and deleting the original.
fn copy_and_remove(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst)?;
    fs::remove_file(src)
}
