use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use licensespring_webhook::{Config, LicenseSpringWebhook};

#[derive(Parser)]
#[command(name = "licensespring-webhook")]
#[command(about = "Send PayPal orders and license requests to LicenseSpring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append the licenses of a PayPal order capture to a LicenseSpring order
    Order {
        /// Capture JSON file, or "-" for stdin
        input: PathBuf,
    },
    /// Fetch license keys for a front-end license request
    Licenses {
        /// Request JSON file, or "-" for stdin
        input: PathBuf,
    },
    /// Print the Date and Authorization headers for a request
    Sign {
        /// RFC 3339 time to sign for (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
}

fn read_input(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "licensespring_webhook=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    tracing::debug!("Loaded config: {:?}", config);
    let webhook = LicenseSpringWebhook::from_config(&config);

    let envelope = match cli.command {
        Commands::Order { input } => {
            let payload = read_input(&input)?;
            webhook.process_paypal_order(&payload).await
        }
        Commands::Licenses { input } => {
            let payload = read_input(&input)?;
            webhook.license_envelope(&payload).await
        }
        Commands::Sign { at } => {
            let at = match at {
                Some(raw) => DateTime::parse_from_rfc3339(&raw)
                    .with_context(|| format!("invalid --at time: {}", raw))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };
            let headers = webhook
                .signer()
                .signed_headers_at(at)
                .context("failed to sign headers")?;
            println!("Date: {}", headers.date);
            println!("Authorization: {}", headers.authorization);
            return Ok(ExitCode::SUCCESS);
        }
    };

    println!("{}", envelope.to_json_pretty());
    Ok(if envelope.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
