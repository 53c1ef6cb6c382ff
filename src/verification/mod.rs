pub mod calibre;
pub mod report;

pub use calibre::{calibre_command, run_calibre};
pub use report::{
    classify_summary, read_fxor_summary, FastXorClassifier, SummaryClassifier, VerificationOutcome,
};
