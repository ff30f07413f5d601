use std::process::ExitCode;

fn main() -> ExitCode {
    ldcheck::cli::run()
}
