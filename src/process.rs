//! Invocation of external EDA tools.
//!
//! Every tool run by the flow goes through an [`Executor`], so a run can be
//! exercised without a Cadence or Mentor installation by substituting an
//! executor that fakes the tool's output files.

use std::ffi::OsStr;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::{Result, SvsError};

/// A fully specified external command.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

/// The captured result of a finished tool.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ToolOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

pub trait Executor {
    /// Runs `cmd` to completion.
    ///
    /// Implementations must return [`SvsError::ToolFailed`] if the tool
    /// exits unsuccessfully.
    fn execute(&self, cmd: &ToolCommand) -> Result<ToolOutput>;
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemExecutor;

impl ToolCommand {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_owned());
        self
    }

    #[inline]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[inline]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    #[inline]
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Short name of the program, used in error messages.
    pub fn tool_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or_else(|| OsStr::new(""))
            .to_string_lossy()
            .into_owned()
    }
}

impl Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in self.args.iter() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl Executor for SystemExecutor {
    fn execute(&self, cmd: &ToolCommand) -> Result<ToolOutput> {
        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        if let Some(dir) = &cmd.current_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| SvsError::Spawn {
            tool: cmd.tool_name(),
            source,
        })?;

        let res = ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!("{} stdout:\n{}", cmd.tool_name(), res.stdout);
        debug!("{} stderr:\n{}", cmd.tool_name(), res.stderr);

        if !output.status.success() {
            return Err(SvsError::ToolFailed {
                tool: cmd.tool_name(),
                code: res.code,
            });
        }

        Ok(res)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records every command instead of running it, then calls `hook` so a
    /// test can fake whatever files the real tool would have produced.
    pub(crate) struct RecordingExecutor<F> {
        pub(crate) commands: RefCell<Vec<ToolCommand>>,
        hook: F,
    }

    impl<F: Fn(&ToolCommand) -> Result<()>> RecordingExecutor<F> {
        pub(crate) fn new(hook: F) -> Self {
            Self {
                commands: RefCell::new(Vec::new()),
                hook,
            }
        }
    }

    impl<F: Fn(&ToolCommand) -> Result<()>> Executor for RecordingExecutor<F> {
        fn execute(&self, cmd: &ToolCommand) -> Result<ToolOutput> {
            self.commands.borrow_mut().push(cmd.clone());
            (self.hook)(cmd)?;
            Ok(ToolOutput {
                code: Some(0),
                ..Default::default()
            })
        }
    }

    #[test]
    fn test_command_display() {
        let cmd = ToolCommand::new("calibre")
            .args(["-gui", "-lvs", "-runset", "/work/CALIBRE/svs.runset"])
            .arg("-batch");
        assert_eq!(
            cmd.to_string(),
            "calibre -gui -lvs -runset /work/CALIBRE/svs.runset -batch"
        );
        assert_eq!(cmd.tool_name(), "calibre");
    }

    #[test]
    fn test_tool_name_strips_directory() {
        let cmd = ToolCommand::new("/tools/cadence/bin/strmout");
        assert_eq!(cmd.tool_name(), "strmout");
    }

    #[test]
    #[cfg(unix)]
    fn test_system_executor_status() {
        let out = SystemExecutor
            .execute(&ToolCommand::new("sh").args(["-c", "echo hello"]))
            .expect("failed to run sh");
        assert_eq!(out.code, Some(0));
        assert_eq!(out.stdout.trim(), "hello");

        let err = SystemExecutor
            .execute(&ToolCommand::new("sh").args(["-c", "exit 3"]))
            .unwrap_err();
        assert!(matches!(
            err,
            SvsError::ToolFailed { code: Some(3), .. }
        ));
    }

    #[test]
    fn test_system_executor_spawn_failure() {
        let err = SystemExecutor
            .execute(&ToolCommand::new("svs-definitely-not-a-real-tool"))
            .unwrap_err();
        assert!(matches!(err, SvsError::Spawn { .. }));
    }
}
