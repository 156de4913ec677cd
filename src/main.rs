use std::sync::Arc;

use anyhow::anyhow;
use tokio::{net::TcpListener, sync::oneshot};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use sumd::{
    addr,
    config::parse_args,
    proto::share_relay_server::ShareRelayServer,
    relay::{AggregationStore, RelayService},
    runner::run_parties,
    transport::{client_tls_config, server_tls_config, TLS_DOMAIN},
    SumdResult,
};

// logging
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn set_up_logs() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() -> SumdResult<()> {
    set_up_logs();
    let cfg = parse_args()?;

    // run-scoped store, constructed here and handed to the service
    let store = Arc::new(AggregationStore::default());
    let service = RelayService::new(store);

    let incoming = TcpListener::bind(addr(cfg.port)).await?;
    let listen_addr = incoming.local_addr()?;
    info!("sumd relay listen addr {:?}", listen_addr);

    let mut builder = Server::builder();
    if let Some(certs_dir) = &cfg.certs_dir {
        builder = builder.tls_config(server_tls_config(certs_dir)?)?;
    }

    let (shutdown_sender, shutdown_receiver) = oneshot::channel::<()>();
    let server_handle = tokio::spawn(
        builder
            .add_service(ShareRelayServer::new(service))
            .serve_with_incoming_shutdown(TcpListenerStream::new(incoming), async {
                let _ = shutdown_receiver.await;
            }),
    );

    let endpoint = match &cfg.certs_dir {
        Some(_) => format!("https://{}:{}", TLS_DOMAIN, listen_addr.port()),
        None => format!("http://127.0.0.1:{}", listen_addr.port()),
    };
    let tls = match &cfg.certs_dir {
        Some(certs_dir) => Some(client_tls_config(certs_dir)?),
        None => None,
    };

    let outcomes = run_parties(&endpoint, tls, &cfg.parties, cfg.call_timeout).await?;

    let mut failures = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(sum) => info!("[{}] final sum: {}", outcome.uid, sum),
            Err(err) => {
                failures += 1;
                error!("[{}] protocol failed: {}", outcome.uid, err);
            }
        }
    }

    let _ = shutdown_sender.send(());
    server_handle.await??;

    if failures > 0 {
        return Err(anyhow!("{} participant(s) failed", failures));
    }
    Ok(())
}
