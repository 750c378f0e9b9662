use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use taskify_back::TaskStore;
use tracing_subscriber::EnvFilter;

/// Task store service.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "TASKIFY_PORT", default_value_t = 5000)]
    port: u16,

    /// RON file holding the task collection.
    #[arg(long, env = "TASKIFY_DATA", default_value = "tasks.ron")]
    data: PathBuf,

    /// PEM certificate; serves HTTPS together with `--key`.
    #[arg(long, env = "SSL_CERT", requires = "key")]
    cert: Option<PathBuf>,

    /// PEM private key for `--cert`.
    #[arg(long, env = "SSL_KEY", requires = "cert")]
    key: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let store = Arc::new(TaskStore::open(&args.data)?);
    let app = taskify_back::app(store);
    let addr = SocketAddr::from(([0; 4], args.port));

    match (args.cert, args.key) {
        (Some(cert), Some(key)) => {
            let config = RustlsConfig::from_pem_file(cert, key).await?;
            tracing::info!(%addr, data = %args.data.display(), "serving tasks over https");

            axum_server::bind_rustls(addr, config)
                .serve(app.into_make_service())
                .await?;
        }
        _ => {
            tracing::info!(%addr, data = %args.data.display(), "serving tasks over http");

            axum_server::bind(addr)
                .serve(app.into_make_service())
                .await?;
        }
    }

    Ok(())
}
