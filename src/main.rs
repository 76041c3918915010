use std::process::ExitCode;

fn main() -> ExitCode {
    match medcross_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("medcross: {e}");
            ExitCode::FAILURE
        }
    }
}
