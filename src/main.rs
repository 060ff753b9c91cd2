use std::process::ExitCode;

fn main() -> ExitCode {
    wav_segmenter_lib::run()
}
