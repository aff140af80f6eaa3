//! mono-osc - monophonic MIDI oscillator
//!
//! Run with: cargo run -- <name> [--midi-port <port>] [--plain]

mod app;
mod command;
mod midi;
mod shell;
mod ui;

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};

use app::App;
use mono_osc::SynthParams;

/// Client names are cut to this many characters
const MAX_NAME_LEN: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "mono-osc", version, about = "Monophonic highest-note-priority MIDI synth")]
struct Cli {
    /// Client name, prompted for when missing
    name: Option<String>,

    /// MIDI input port, by index or name substring
    #[arg(short = 'p', long)]
    midi_port: Option<String>,

    /// List MIDI input ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Starting waveform: a sine, b square, c sawtooth, d triangle
    #[arg(short, long)]
    waveform: Option<char>,

    /// Starting amplitude; negative inverts the phase
    #[arg(short, long, allow_negative_numbers = true)]
    amplitude: Option<f32>,

    /// Starting number of fourier iterations
    #[arg(short = 'i', long)]
    harmonics: Option<u32>,

    /// MIDI channel to listen on, 0 for all
    #[arg(short, long)]
    channel: Option<u8>,

    /// Line-oriented console instead of the terminal UI
    #[arg(long)]
    plain: bool,

    /// Log file for the terminal UI (default: mono-osc.log in the temp dir)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli)?;

    if cli.list_ports {
        for (index, name) in midi::list_ports("mono-osc")?.iter().enumerate() {
            println!("{index}: {name}");
        }
        return Ok(());
    }

    let name = match &cli.name {
        Some(name) => name.clone(),
        None => prompt_name()?,
    };
    let name: String = name.chars().take(MAX_NAME_LEN).collect();

    let params = Arc::new(SynthParams::new());
    apply_startup(&params, &cli)?;
    log::info!("starting '{name}' with {:?}", params.snapshot());

    App::new(name)
        .params(params)
        .midi_port(cli.midi_port)
        .plain(cli.plain)
        .run()
}

/// stderr in plain mode, a file under the TUI
fn init_logging(cli: &Cli) -> EyreResult<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if !cli.plain && !cli.list_ports {
        let path = cli
            .log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("mono-osc.log"));
        let file = File::create(&path)
            .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn prompt_name() -> EyreResult<String> {
    print!("Type client name (max {MAX_NAME_LEN} char): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line).wrap_err("failed to read client name")?;
    let name = match line.trim() {
        "" => "mono-osc",
        name => name,
    };
    Ok(name.to_string())
}

/// Command-line values go through the same checks as the console.
fn apply_startup(params: &SynthParams, cli: &Cli) -> EyreResult<()> {
    if let Some(letter) = cli.waveform {
        params.set_waveform_letter(letter).wrap_err("--waveform")?;
    }
    if let Some(amplitude) = cli.amplitude {
        params.set_amplitude(amplitude).wrap_err("--amplitude")?;
    }
    if let Some(harmonics) = cli.harmonics {
        params.set_harmonics(harmonics).wrap_err("--harmonics")?;
    }
    if let Some(channel) = cli.channel {
        params.set_channel(channel).wrap_err("--channel")?;
    }
    Ok(())
}
