use std::process::ExitCode;

fn main() -> ExitCode {
    myjs::cli::run()
}
