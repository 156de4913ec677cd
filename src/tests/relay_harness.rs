use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Server};

use crate::{
    addr,
    proto::share_relay_client::ShareRelayClient,
    proto::share_relay_server::ShareRelayServer,
    relay::RelayService,
};

/// One in-process relay server bound to an OS-picked port, shut down through
/// a oneshot channel.
pub(super) struct TestRelay {
    endpoint: String,
    server_handle: JoinHandle<()>,
    shutdown_sender: oneshot::Sender<()>,
}

impl TestRelay {
    pub(super) async fn start(service: RelayService) -> Self {
        let incoming = TcpListener::bind(addr(0)).await.unwrap(); // let the OS pick a port
        let server_addr = incoming.local_addr().unwrap();

        let (shutdown_sender, shutdown_receiver) = oneshot::channel::<()>();
        let server_handle = tokio::spawn(async move {
            Server::builder()
                .add_service(ShareRelayServer::new(service))
                .serve_with_incoming_shutdown(TcpListenerStream::new(incoming), async {
                    shutdown_receiver.await.unwrap();
                })
                .await
                .unwrap();
        });

        Self {
            endpoint: format!("http://{}", server_addr),
            server_handle,
            shutdown_sender,
        }
    }

    pub(super) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(super) async fn connect(&self) -> ShareRelayClient<Channel> {
        ShareRelayClient::connect(self.endpoint.clone()).await.unwrap()
    }

    pub(super) async fn shutdown(self) {
        self.shutdown_sender.send(()).unwrap();
        self.server_handle.await.unwrap();
    }
}
