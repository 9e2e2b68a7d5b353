//! ipasn - IP to ASN lookups through Team Cymru's DNS interface.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match cymru_cli::run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
