use std::fmt::Display;
use std::time::Duration;

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::job::{CheckType, JobSpec};
use crate::plan::TaskKey;
use crate::Result;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Pending,
    InProgress,
    Skipped,
    Failed,
}

pub struct StepContext {
    step_num: usize,
    steps: Vec<Step>,
    mp: MultiProgress,
}

pub struct Step {
    desc: String,
    key: TaskKey,
    progress_bar: ProgressBar,
    status: StepStatus,
}

impl StepContext {
    pub fn new(job: &JobSpec) -> Self {
        println!("Tasks:");

        let [d1, d2] = job.designs();
        let (tool, flavor) = match job.check_type() {
            CheckType::Schematic => ("si", "SVS"),
            CheckType::Layout => ("strmout", "LVL"),
        };

        let mut steps: Vec<Step> = [
            (
                TaskKey::Extract(0),
                format!("Run {tool} on {}/{}/{}", d1.library, d1.cell, d1.view),
            ),
            (
                TaskKey::Extract(1),
                format!("Run {tool} on {}/{}/{}", d2.library, d2.cell, d2.view),
            ),
            (TaskKey::GenerateRunset, format!("Generate {flavor} runset")),
            (TaskKey::RunCalibre, format!("Run Calibre {flavor}")),
            (TaskKey::ReadReport, "Read report".to_string()),
        ]
        .into_iter()
        .map(|(key, desc)| Step {
            desc,
            key,
            progress_bar: ProgressBar::new_spinner(),
            status: StepStatus::Pending,
        })
        .collect();

        let mp = MultiProgress::new();
        let num_steps = steps.len();
        let width = format!("{}", num_steps).len();
        for (i, step) in steps.iter_mut().enumerate() {
            mp.insert(i + 1, step.progress_bar.clone());
            let msg = format!("[{:width$}/{:width$}] {}", i + 1, num_steps, step.desc);
            step.set_status(StepStatus::Pending, Some(msg));
        }

        let mut ctx = StepContext {
            step_num: 0,
            steps,
            mp,
        };
        if let Some(step) = ctx.current_step() {
            step.set_status(StepStatus::InProgress, None);
        }
        ctx
    }

    pub fn advance(&mut self) {
        self.step_num += 1;
    }

    #[inline]
    pub fn current_step(&mut self) -> Option<&mut Step> {
        self.steps.get_mut(self.step_num)
    }

    /// Hides the step display while `f` runs, so that anything `f` prints
    /// is not drawn over by the spinners.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.mp.suspend(f)
    }

    pub fn println(&self, msg: impl AsRef<str>) {
        self.suspend(|| println!("{}", msg.as_ref()));
    }

    /// Marks the current step failed and all later steps skipped if `res`
    /// is an error, then passes `res` through.
    pub fn check<T>(&mut self, res: Result<T>) -> Result<T> {
        if res.is_err() {
            if let Some(current_step) = self.current_step() {
                current_step.set_status(StepStatus::Failed, None);
                self.advance();
                while let Some(current_step) = self.current_step() {
                    current_step.set_status(StepStatus::Skipped, None);
                    self.advance();
                }
            }
            self.println("");
        }

        res
    }

    pub fn finish(&mut self, key: TaskKey) {
        if let Some(current_step) = self.current_step() {
            if current_step.key != key {
                panic!("A step was completed out of order");
            }

            current_step.set_status(StepStatus::Done, None);

            self.advance();

            if let Some(current_step) = self.current_step() {
                current_step.set_status(StepStatus::InProgress, None);
            } else {
                self.done();
            }
        } else {
            panic!("A step was completed after all steps were marked completed");
        }
    }

    pub fn done(&mut self) {
        self.println("\nCompleted all tasks");
    }

    pub fn statuses(&self) -> Vec<StepStatus> {
        self.steps.iter().map(|step| step.status).collect()
    }
}

fn format_template(spinner: bool, status: impl Display) -> String {
    if spinner {
        format!("{{spinner:.green}} {:16} {{msg}}", status)
    } else {
        format!("  {:16} {{msg}}", status)
    }
}

impl Step {
    fn set_status(&mut self, status: StepStatus, msg: Option<String>) {
        self.status = status;
        let status_template = match status {
            StepStatus::Done => format_template(false, "Done".green().bold()),
            StepStatus::Failed => format_template(false, "Failed".bright_white().on_red().bold()),
            StepStatus::InProgress => format_template(true, "In Progress".bright_white().bold()),
            StepStatus::Pending => format_template(true, "Pending".blue().bold()),
            StepStatus::Skipped => format_template(false, "Skipped".yellow().bold()),
        };
        let style = ProgressStyle::with_template(&status_template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        self.progress_bar.set_style(style);

        if let Some(msg) = msg {
            self.progress_bar.set_message(msg);
        }

        if status == StepStatus::InProgress {
            self.progress_bar
                .enable_steady_tick(Duration::from_millis(200));
        } else if status != StepStatus::Pending {
            self.progress_bar.finish();
        }
    }
}
