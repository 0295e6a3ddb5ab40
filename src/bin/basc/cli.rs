//! Command-line argument parsing for `basc`, per spec.md §6. A single
//! flat command — there is no subcommand here, unlike a multi-command
//! frontend — so `Cli` is a plain `#[derive(Parser)]` struct rather than
//! a `Commands` enum.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compiles a Locomotive BASIC subset to Z80 assembly for the Amstrad CPC.")]
pub struct Cli {
    /// The `.bas` source file to compile.
    #[arg(index = 1)]
    pub source: PathBuf,

    /// Where to write the generated assembly. Defaults to the source
    /// path with its extension replaced by `.asm`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// The CODE AREA's start address, as `&`-prefixed hex, bare hex
    /// (`0x4000`), or decimal.
    #[arg(long, value_parser = parse_org, default_value = "&4000")]
    pub org: u16,

    /// Raise the log level: once for `Info`, twice for `Debug`, three or
    /// more times for `Trace`. The default level is `Warn`.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also emit a `.lst` listing alongside the assembly.
    #[arg(long)]
    pub listing: bool,

    /// Also emit a `.map` symbol map alongside the assembly.
    #[arg(long)]
    pub map: bool,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }

    pub fn log_level(&self) -> log::Level {
        match self.verbose {
            0 => log::Level::Warn,
            1 => log::Level::Info,
            2 => log::Level::Debug,
            _ => log::Level::Trace,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self.source.with_extension("asm"),
        }
    }
}

fn parse_org(text: &str) -> Result<u16, String> {
    let digits = text
        .strip_prefix('&')
        .or_else(|| text.strip_prefix("0x"))
        .or_else(|| text.strip_prefix("0X"));
    let result = match digits {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => text.parse::<u16>().or_else(|_| u16::from_str_radix(text, 16)),
    };
    result.map_err(|_| format!("'{text}' is not a valid address (expected e.g. &4000, 0x4000, or 16384)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ampersand_hex() {
        assert_eq!(parse_org("&4000"), Ok(0x4000));
    }

    #[test]
    fn parses_decimal() {
        assert_eq!(parse_org("16384"), Ok(16384));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_org("not-an-address").is_err());
    }
}
