//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

#[expect(
    clippy::print_stderr,
    reason = "The binary reports fatal errors on stderr before exiting"
)]
fn main() {
    if let Err(err) = roamer_cli::run() {
        eprintln!("roamer: {err}");
        std::process::exit(1);
    }
}
