use std::process::ExitCode;

fn main() -> ExitCode {
    match hospital_desk_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hospital-desk: {e}");
            ExitCode::FAILURE
        }
    }
}
