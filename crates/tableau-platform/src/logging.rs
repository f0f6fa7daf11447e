use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use env_logger::{Env, Target};

/// Writes every record to stderr and to a log file.
struct Tee {
    file: File,
    console: io::Stderr,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        self.console.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.console.flush()
    }
}

/// Installs the global logger. `RUST_LOG` overrides the default `info`
/// filter. With `log_file`, the file is truncated and receives a copy of
/// everything printed.
pub fn init(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        let file = File::create(path).with_context(|| format!("opening log {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(Tee {
            file,
            console: io::stderr(),
        })));
    }
    builder.try_init().context("logger already installed")?;
    if let Some(path) = log_file {
        log::debug!("logging to {}", path.display());
    }
    Ok(())
}
