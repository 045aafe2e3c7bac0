use std::process::ExitCode;

use sms_send::{cli, setup_logging};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse_args();

    if let Err(err) = setup_logging(args.debug) {
        eprintln!("{err:#}");
    }

    match cli::execute_command(&args).await {
        Ok(response) => {
            println!("{}", cli::success_report(&response));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error sending SMS: {err:#}");
            ExitCode::FAILURE
        }
    }
}
