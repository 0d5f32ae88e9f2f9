mod cli;

use std::fs::File;
use std::io;
use std::os::fd::AsFd;
use std::process::ExitCode;

use clap::Parser;
use cli::CliArgs;
use fmap::{FdProbe, logging};
use log::error;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(err) = logging::init(args.verbose) {
        eprintln!("fmap: cannot install logger: {err}");
    }

    let stdin = io::stdin();
    let probe = FdProbe::new(stdin.as_fd());
    // Raw reads on fd 0: input past the mapped range stays unread for the next reader
    let mut input = match stdin.as_fd().try_clone_to_owned() {
        Ok(fd) => File::from(fd),
        Err(err) => {
            error!("stdin: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut output = io::stdout().lock();

    // Unmap/close failures are logged as warnings inside `run` and never reach here
    match fmap::run(&args.request(), &probe, &mut input, &mut output) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
