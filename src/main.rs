use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use hotel_concierge::store::BookingLedger;
use hotel_concierge::voice::{
    AudioCapture, AudioPlayback, SAMPLE_RATE, SpeechOutput, TextToSpeech, samples_to_wav,
    signal_levels,
};
use hotel_concierge::{Collaborators, Concierge, Config, console};

/// Concierge - voice and text hotel search and booking assistant
#[derive(Parser)]
#[command(name = "concierge", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable voice features (for machines without audio hardware)
    #[arg(long, env = "CONCIERGE_DISABLE_VOICE")]
    disable_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive booking session (default)
    Run,
    /// List stored bookings
    Bookings,
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,hotel_concierge=info",
        1 => "info,hotel_concierge=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_with_options(cli.disable_voice)?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run_session(&config).await,
        Command::Bookings => list_bookings(&config),
        Command::TestMic { duration } => test_mic(duration).await,
        Command::TestTts { text } => test_tts(&config, &text).await,
    }
}

/// Interactive booking session
#[allow(clippy::future_not_send)]
async fn run_session(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        data_dir = %config.data_dir.display(),
        voice = config.voice.enabled,
        "starting hotel concierge"
    );

    let collaborators = Collaborators::from_config(config)?;

    let playback = if collaborators.speech_out.is_some() {
        match AudioPlayback::new() {
            Ok(playback) => Some(playback),
            Err(e) => {
                tracing::warn!(error = %e, "no audio output, spoken replies will not be played");
                None
            }
        }
    } else {
        None
    };

    let mut concierge = Concierge::new(collaborators, config.voice.record_seconds);
    console::run(&mut concierge, playback.as_ref(), config.search.default_adults).await
}

/// Print every stored booking
fn list_bookings(config: &Config) -> anyhow::Result<()> {
    let ledger = BookingLedger::open(&config.database_path(), config.spreadsheet_path())?;
    let bookings = ledger.bookings()?;

    if bookings.is_empty() {
        println!("No bookings yet.");
        return Ok(());
    }

    for booking in &bookings {
        println!(
            "{}  {:<24} {:<32} {} -> {}  ₹{}",
            booking.booking_timestamp,
            booking.user_name,
            booking.hotel_name,
            booking.check_in,
            booking.check_out,
            booking.price
        );
    }
    println!("\n{} booking(s) in {}", bookings.len(), config.database_path().display());

    Ok(())
}

/// Record one window the way a spoken query is recorded and report its levels
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Recording {duration}s from the default microphone, speak now...");

    let samples = tokio::task::spawn_blocking(move || {
        let mut capture = AudioCapture::new()?;
        capture.record_blocking(Duration::from_secs(duration))
    })
    .await??;

    let wav = samples_to_wav(&samples, SAMPLE_RATE)?;
    println!(
        "Captured {} samples at {SAMPLE_RATE} Hz ({} bytes of WAV for transcription)\n",
        samples.len(),
        wav.len()
    );

    let levels = signal_levels(&samples, SAMPLE_RATE as usize);
    for (second, level) in levels.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bar = (level.rms * 100.0).min(40.0) as usize;
        println!(
            "{:>3}s  rms {:.4}  peak {:.4}  |{:<40}|",
            second + 1,
            level.rms,
            level.peak,
            "=".repeat(bar)
        );
    }

    if levels.iter().all(|l| l.is_silent()) {
        println!("\nOnly silence was captured. Check the input device and its volume,");
        println!("or start with --disable-voice to type queries instead.");
    } else {
        println!("\nMicrophone is picking up sound.");
    }

    Ok(())
}

/// Test TTS output via `OpenAI`
async fn test_tts(config: &Config, text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let api_key: SecretString = config
        .api_keys
        .openai
        .clone()
        .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is not set"))?;

    let tts = TextToSpeech::new_openai(
        api_key,
        config.voice.tts_model.clone(),
        config.voice.tts_voice.clone(),
        config.voice.tts_speed,
        config.http_timeout(),
    )?;

    println!("Synthesizing speech...");
    let mp3_data = tts.synthesize(text).await?;
    println!("Got {} bytes of audio data", mp3_data.len());

    // Check MP3 header
    if mp3_data.len() > 3 {
        println!(
            "First 4 bytes: {:02x} {:02x} {:02x} {:02x}",
            mp3_data[0], mp3_data[1], mp3_data[2], mp3_data[3]
        );
    }

    println!("Playing audio...");
    let playback = AudioPlayback::new()?;
    tokio::task::block_in_place(|| playback.play_mp3(&mp3_data))?;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}
