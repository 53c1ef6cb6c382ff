use std::path::Path;

use crate::config::SvsConfig;
use crate::job::CheckType;
use crate::process::{Executor, ToolCommand, ToolOutput};
use crate::Result;

/// Builds the batch-mode Calibre Interactive invocation for `runset`.
pub fn calibre_command(
    runset: impl AsRef<Path>,
    check_type: CheckType,
    config: &SvsConfig,
) -> ToolCommand {
    let mode = match check_type {
        CheckType::Schematic => "-lvs",
        CheckType::Layout => "-drc",
    };
    ToolCommand::new(&config.tools.calibre)
        .args(["-gui", mode, "-runset"])
        .arg(runset.as_ref().display().to_string())
        .arg("-batch")
}

/// Runs Calibre against `runset` and blocks until it exits.
pub fn run_calibre(
    runset: impl AsRef<Path>,
    check_type: CheckType,
    work_dir: impl AsRef<Path>,
    config: &SvsConfig,
    executor: &impl Executor,
) -> Result<ToolOutput> {
    let cmd = calibre_command(runset, check_type, config).current_dir(work_dir);
    println!("{cmd}");
    executor.execute(&cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::tests::RecordingExecutor;

    #[test]
    fn test_calibre_command() {
        let config = SvsConfig::default();
        assert_eq!(
            calibre_command("/work/CALIBRE/svs.runset", CheckType::Schematic, &config).to_string(),
            "calibre -gui -lvs -runset /work/CALIBRE/svs.runset -batch"
        );
        assert_eq!(
            calibre_command("/work/CALIBRE/lvl.runset", CheckType::Layout, &config).to_string(),
            "calibre -gui -drc -runset /work/CALIBRE/lvl.runset -batch"
        );
    }

    #[test]
    fn test_run_calibre_uses_work_dir() -> anyhow::Result<()> {
        let mut config = SvsConfig::default();
        config.tools.calibre = "/tools/mentor/bin/calibre".into();
        let executor = RecordingExecutor::new(|_: &ToolCommand| Ok(()));

        run_calibre("lvl.runset", CheckType::Layout, "/work", &config, &executor)?;

        let commands = executor.commands.borrow();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].get_current_dir(), Some(Path::new("/work")));
        assert_eq!(commands[0].tool_name(), "calibre");
        assert_eq!(commands[0].get_args()[1], "-drc");
        Ok(())
    }
}
