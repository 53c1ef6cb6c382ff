use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use crate::cli::args::{Args, UsageError};
use crate::cli::progress::StepContext;
use crate::config::svs::load_svs_config;
use crate::job::JobSpec;
use crate::plan::{execute_job, ExecuteJobParams};
use crate::process::SystemExecutor;
use crate::verification::{FastXorClassifier, VerificationOutcome};

pub mod args;
pub mod progress;

pub const CORRECT: &str = r"
	       #     ####################     _   _
	      #      #                  #     *   *
	 #   #       #      CORRECT     #       |
	  # #        #                  #     \___/
	   #         ####################
";

pub const INCORRECT: &str = r"
	 #   #       ####################
	  # #        #                  #
	   #         #     INCORRECT    #
	  # #        #                  #
	 #   #       ####################
";

/// Parses command line arguments into a job, printing usage and returning a
/// [`UsageError`] if they are malformed.
pub fn parse_args() -> Result<(Args, JobSpec), UsageError> {
    let err = match Args::try_parse() {
        Ok(args) => match args.job() {
            Ok(job) => return Ok((args, job)),
            Err(e) => e,
        },
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => UsageError(e.to_string().trim().to_string()),
    };

    println!("{}\n", Args::command().render_help());
    Err(err)
}

pub fn run() -> anyhow::Result<()> {
    let (args, job) = parse_args()?;

    let work_dir = match args.work_dir {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir().with_context(|| "Error finding current directory")?,
    };
    let work_dir = work_dir
        .canonicalize()
        .with_context(|| format!("Error resolving work directory {:?}", work_dir))?;
    println!("Current directory found: {}", work_dir.display());

    let config = load_svs_config(args.config.as_deref(), &work_dir)
        .with_context(|| "Error reading configuration file")?;
    log::debug!("{:?}", &config);

    let mut ctx = StepContext::new(&job);

    let output = execute_job(ExecuteJobParams {
        work_dir: &work_dir,
        job: &job,
        config: &config,
        executor: &SystemExecutor,
        classifier: &FastXorClassifier::default(),
        ctx: Some(&mut ctx),
    })?;

    match output.outcome {
        Some(VerificationOutcome::Match) => println!("\n{}", CORRECT.green().bold()),
        Some(VerificationOutcome::Mismatch) => println!("\n{}", INCORRECT.red().bold()),
        None => println!("\nReport saved to: {}", output.report.display()),
    }

    println!("\nComplete!\n");

    Ok(())
}
