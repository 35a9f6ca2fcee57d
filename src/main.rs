//! CLI entry point for `mailseal`.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use humansize::{format_size, DECIMAL};

use mailseal::classify::{classify, ContentKind};
use mailseal::codec::envelope;
use mailseal::compose::{self, FileInput};
use mailseal::config::Config;
use mailseal::model::Metadata;

#[derive(Parser)]
#[command(name = "mailseal", version)]
#[command(about = "Encode and decode encrypted-email envelopes and compressed attachments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Wrap a pre-encrypted payload in an envelope body
    Seal {
        /// File containing the ciphertext ("-" for stdin)
        payload: PathBuf,
        /// Metadata entries, key=value (repeatable)
        #[arg(short, long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,
        /// Scheme banner to prefix (e.g. "AES", "QKD")
        #[arg(long)]
        scheme: Option<String>,
    },
    /// Classify a body and extract its envelope
    Open {
        /// Body text file or raw .eml ("-" for stdin)
        input: PathBuf,
        /// Treat the input as a raw RFC 822 message
        #[arg(long)]
        eml: bool,
        /// Print only the payload, suitable for piping to a decryptor
        #[arg(long)]
        payload_only: bool,
    },
    /// Assemble a plaintext body with compressed audio/file blocks
    Pack {
        /// File containing the message text ("-" for stdin)
        body: PathBuf,
        /// Files to attach
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,
        /// Audio recording to embed
        #[arg(long)]
        audio: Option<PathBuf>,
        /// MIME type of the audio recording
        #[arg(long, value_name = "MIME")]
        audio_mime: Option<String>,
    },
    /// Scan decrypted text and write its attachments to a directory
    Unpack {
        /// File containing the decrypted text ("-" for stdin)
        input: PathBuf,
        /// Output directory for reconstructed attachments
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = mailseal::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Seal {
            payload,
            meta,
            scheme,
        } => cmd_seal(&payload, &meta, scheme.as_deref(), &config),
        Commands::Open {
            input,
            eml,
            payload_only,
        } => cmd_open(&input, eml, payload_only),
        Commands::Pack {
            body,
            files,
            audio,
            audio_mime,
        } => cmd_pack(&body, &files, audio.as_deref(), audio_mime.as_deref(), &config),
        Commands::Unpack { input, output } => cmd_unpack(&input, &output),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = mailseal::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "mailseal.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Read a file argument, treating "-" as stdin.
fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read(path)?)
    }
}

fn cmd_seal(
    payload_path: &Path,
    meta: &[String],
    scheme: Option<&str>,
    config: &Config,
) -> anyhow::Result<()> {
    let payload = String::from_utf8(read_input(payload_path)?)?;
    let payload = payload.trim();

    let mut metadata = Metadata::new();
    for entry in meta {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("metadata entry '{entry}' is not KEY=VALUE"))?;
        metadata.insert(key.trim().to_string(), value.trim().to_string());
    }

    let body = compose::seal_body(scheme, metadata, payload, config.codec.payload_wrap_width);
    println!("{body}");
    Ok(())
}

fn cmd_open(input: &Path, eml: bool, payload_only: bool) -> anyhow::Result<()> {
    let raw = read_input(input)?;

    let (body, declared_type) = if eml {
        let extracted = mailseal::mime::body_from_raw(&raw);
        (extracted.text, extracted.declared_type)
    } else {
        (String::from_utf8_lossy(&raw).into_owned(), None)
    };

    match classify(&body, declared_type.as_deref()) {
        ContentKind::Encrypted => {
            // Classification already proved this extracts.
            let env = envelope::extract(&body)?;
            if payload_only {
                println!("{}", env.payload);
                return Ok(());
            }
            println!("classification: encrypted");
            for (key, value) in &env.metadata {
                println!("  {key}: {value}");
            }
            println!("payload: {} base64 characters", env.payload.len());
        }
        kind => {
            if payload_only {
                anyhow::bail!("body is not an encrypted envelope ({kind})");
            }
            println!("classification: {kind}");
            // A failed extraction falls back to the raw body, never blank
            // output.
            println!("{body}");
        }
    }
    Ok(())
}

fn cmd_pack(
    body_path: &Path,
    files: &[PathBuf],
    audio: Option<&Path>,
    audio_mime: Option<&str>,
    config: &Config,
) -> anyhow::Result<()> {
    let body = String::from_utf8(read_input(body_path)?)?;

    let audio_data = audio.map(std::fs::read).transpose()?;
    let recording = audio_data.as_deref().map(|data| {
        let mime = audio_mime.unwrap_or(config.audio.capture_mime_type.as_str());
        (mime, data)
    });

    let mut inputs = Vec::new();
    for path in files {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        tracing::info!(
            name,
            size = %format_size(data.len(), DECIMAL),
            "attaching file"
        );
        inputs.push(FileInput {
            mime_type: guess_mime(&name),
            name,
            data,
        });
    }

    let packed = compose::pack_plaintext(
        body.trim_end(),
        recording,
        &inputs,
        config.codec.compression_level,
    )?;
    println!("{packed}");
    Ok(())
}

fn cmd_unpack(input: &Path, output: &Path) -> anyhow::Result<()> {
    let text = String::from_utf8(read_input(input)?)?;
    let decoded = compose::unpack_plaintext(&text);

    std::fs::create_dir_all(output)?;

    if let Some(recording) = &decoded.audio {
        let path = mailseal::export::write_recording(recording, output)?;
        println!(
            "wrote {} ({}, {})",
            path.display(),
            recording.mime_type,
            format_size(recording.data.len(), DECIMAL)
        );
    }

    for attachment in &decoded.attachments {
        let path = mailseal::export::write_attachment(attachment, output)?;
        println!(
            "wrote {} ({}, {})",
            path.display(),
            attachment.mime_type,
            format_size(attachment.data.len(), DECIMAL)
        );
    }

    for failure in &decoded.failures {
        eprintln!("warning: {failure}");
    }

    println!("---");
    println!("{}", decoded.text);
    Ok(())
}

fn guess_mime(name: &str) -> String {
    let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "webm" => "audio/webm",
        "mp3" => "audio/mpeg",
        "mp4" => "audio/mp4",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
    .to_string()
}
