pub mod outcome;
pub mod run;
pub mod summary;

pub use outcome::{ProjectOutcome, RunReport, SkipReason};
pub use run::{execute_run, RunSettings};
pub use summary::render_summary;
