use std::io::{self, Write};
use std::process::ExitCode;

use positbench::{logging, platform, Sweep, SweepConfig};

fn run<W: Write>(sink: &mut W) -> positbench::Result<()> {
    platform::write_summary(sink)?;

    let sweep = Sweep::new(SweepConfig::default());
    sweep.run(sink)?;

    sink.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    logging::init_subscriber();

    let stdout = io::stdout();
    let mut sink = stdout.lock();

    match run(&mut sink) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "sweep aborted");
            ExitCode::FAILURE
        }
    }
}
