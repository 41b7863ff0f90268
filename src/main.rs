use std::process::ExitCode;

fn main() -> ExitCode {
    match voc2vott::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
