use std::path::{Path, PathBuf};

use log::info;

use crate::cli::progress::StepContext;
use crate::config::SvsConfig;
use crate::job::{CheckType, Design, JobSpec};
use crate::netlist::{extract, ExtractParams, NetlistResult};
use crate::paths::{out_dir, out_fxor_summary, out_lvs_report};
use crate::process::Executor;
use crate::runset::{write_runset, RunsetData};
use crate::verification::report::{read_report, tail};
use crate::verification::{run_calibre, SummaryClassifier, VerificationOutcome};
use crate::Result;

/// Number of summary lines echoed after an LVL run.
pub const SUMMARY_TAIL_LINES: usize = 20;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TaskKey {
    /// Extract the first or second design.
    Extract(usize),
    GenerateRunset,
    RunCalibre,
    ReadReport,
}

pub struct ExecuteJobParams<'a, E, C> {
    pub work_dir: &'a Path,
    pub job: &'a JobSpec,
    pub config: &'a SvsConfig,
    pub executor: &'a E,
    pub classifier: &'a C,
    pub ctx: Option<&'a mut StepContext>,
}

/// Artifacts and result of a completed job.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct JobOutput {
    pub netlists: [NetlistResult; 2],
    pub runset: PathBuf,
    pub report: PathBuf,
    /// `None` for SVS runs, whose report is left for the user to read.
    pub outcome: Option<VerificationOutcome>,
}

macro_rules! try_finish_task {
    ( $ctx:expr, $task:expr ) => {
        if let Some(ctx) = $ctx.as_mut() {
            ctx.finish($task);
        }
    };
}

macro_rules! try_check {
    ( $ctx:expr, $res:expr ) => {
        match $ctx.as_mut() {
            Some(ctx) => ctx.check($res)?,
            None => $res?,
        }
    };
}

/// Runs a step with the step display suspended, so that the command lines
/// and files it prints are not overwritten, then checks its result.
macro_rules! try_step {
    ( $ctx:expr, $res:expr ) => {{
        let res = console(&$ctx, || $res);
        try_check!($ctx, res)
    }};
}

fn console<R>(ctx: &Option<&mut StepContext>, f: impl FnOnce() -> R) -> R {
    match ctx {
        Some(ctx) => ctx.suspend(f),
        None => f(),
    }
}

pub fn execute_job<E: Executor, C: SummaryClassifier>(
    params: ExecuteJobParams<E, C>,
) -> Result<JobOutput> {
    let ExecuteJobParams {
        work_dir,
        job,
        config,
        executor,
        classifier,
        mut ctx,
    } = params;

    let check_type = job.check_type();
    let out_dir = out_dir(work_dir, check_type);
    info!("current directory: {:?}", work_dir);

    let designs = job.designs();
    let extract_design = |design: &Design| {
        extract(
            &ExtractParams {
                design,
                work_dir,
                out_dir: &out_dir,
                check_type,
                config,
            },
            executor,
        )
    };

    let first = try_step!(ctx, extract_design(&designs[0]));
    try_finish_task!(ctx, TaskKey::Extract(0));
    let second = try_step!(ctx, extract_design(&designs[1]));
    try_finish_task!(ctx, TaskKey::Extract(1));
    let netlists = [first, second];

    console(&ctx, || {
        println!("\nCreated:\n");
        for netlist in netlists.iter() {
            println!("\t{}\n", netlist.path.display());
        }
    });

    let data = RunsetData::new(job, &netlists);
    let runset = try_step!(ctx, write_runset(&data, check_type, work_dir, config));
    try_finish_task!(ctx, TaskKey::GenerateRunset);

    try_step!(
        ctx,
        run_calibre(&runset, check_type, work_dir, config, executor)
    );
    try_finish_task!(ctx, TaskKey::RunCalibre);

    let (report, outcome) = try_step!(
        ctx,
        open_report(work_dir, job.cell(), check_type, classifier)
    );
    try_finish_task!(ctx, TaskKey::ReadReport);

    Ok(JobOutput {
        netlists,
        runset,
        report,
        outcome,
    })
}

/// Displays the Calibre report for a finished run.
///
/// SVS reports are printed whole and not interpreted. LVL summaries are
/// tailed and classified.
pub fn open_report(
    work_dir: &Path,
    top: &str,
    check_type: CheckType,
    classifier: &impl SummaryClassifier,
) -> Result<(PathBuf, Option<VerificationOutcome>)> {
    match check_type {
        CheckType::Schematic => {
            let path = out_lvs_report(work_dir, top);
            let report = read_report(&path)?;
            println!("{report}");
            Ok((path, None))
        }
        CheckType::Layout => {
            let path = out_fxor_summary(work_dir);
            let summary = read_report(&path)?;
            for line in tail(&summary, SUMMARY_TAIL_LINES) {
                println!("{line}");
            }
            Ok((path, Some(classifier.classify(&summary))))
        }
    }
}
