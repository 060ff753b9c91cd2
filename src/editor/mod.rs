pub mod actions;

pub use actions::{list_wav_files, split_directory, split_file, BatchReport, FileOutcome, SplitSummary};
