use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use crate::config::CoordinatorCredentials;
use crate::relay::{ChangeRecord, RelayClient};

/// How long do we wait for the relay to finish talking to the coordinator.
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Something that the mock coordinator observed, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoordinatorEvent {
    Login { username: String, password: String },
    RejectedLogin { username: String },
    /// A change was acknowledged.
    Change(ChangeRecord),
    /// A change was answered with an error.
    RefusedChange(ChangeRecord),
    /// The client closed its side of the connection.
    Closed,
}

#[derive(Default)]
pub struct MockCoordinatorBehavior {
    /// Reject every login with this reason.
    pub reject_login: Option<String>,
    /// Refuse the n-th (1-based) change of each connection.
    pub fail_on_change: Option<usize>,
}

#[derive(Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
enum ReceivedRequest {
    Login { username: String, password: String },
    AddChange { change: ChangeRecord },
}

#[derive(Default)]
struct CoordinatorState {
    events: Vec<CoordinatorEvent>,
    connections: usize,
}

/// Coordinator listening on a local TCP port, which records everything it receives.
pub struct MockCoordinator {
    address: SocketAddr,
    state: Arc<Mutex<CoordinatorState>>,
    disconnect_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<()>>,
}

impl MockCoordinator {
    pub async fn start(behavior: MockCoordinatorBehavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(CoordinatorState::default()));
        let (disconnect_tx, disconnect_rx) = mpsc::unbounded_channel();

        let behavior = Arc::new(behavior);
        let server_state = state.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                server_state.lock().unwrap().connections += 1;
                let behavior = behavior.clone();
                let state = server_state.clone();
                let disconnect_tx = disconnect_tx.clone();
                tokio::spawn(async move {
                    handle_connection(stream, &behavior, &state).await;
                    state.lock().unwrap().events.push(CoordinatorEvent::Closed);
                    let _ = disconnect_tx.send(());
                });
            }
        });

        Self {
            address,
            state,
            disconnect_rx: tokio::sync::Mutex::new(disconnect_rx),
        }
    }

    pub fn address(&self) -> String {
        self.address.to_string()
    }

    /// Relay pointed at this coordinator, using the default credentials.
    pub fn relay_client(&self) -> RelayClient {
        RelayClient::new(self.address(), CoordinatorCredentials::default())
    }

    /// Waits until one more client connection has ended.
    pub async fn wait_for_disconnect(&self) {
        let mut rx = self.disconnect_rx.lock().await;
        tokio::time::timeout(DISCONNECT_TIMEOUT, rx.recv())
            .await
            .expect("Timed out waiting for the relay to disconnect")
            .expect("Coordinator has stopped");
    }

    pub fn events(&self) -> Vec<CoordinatorEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn connection_count(&self) -> usize {
        self.state.lock().unwrap().connections
    }

    /// Changes that were acknowledged, across all connections.
    pub fn delivered_changes(&self) -> Vec<ChangeRecord> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                CoordinatorEvent::Change(change) => Some(change),
                _ => None,
            })
            .collect()
    }
}

async fn handle_connection(
    stream: TcpStream,
    behavior: &MockCoordinatorBehavior,
    state: &Mutex<CoordinatorState>,
) {
    let mut stream = BufReader::new(stream);
    let mut changes = 0;
    let mut line = String::new();
    loop {
        line.clear();
        match stream.read_line(&mut line).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }

        let request: ReceivedRequest =
            serde_json::from_str(line.trim_end()).expect("Invalid coordinator request");
        let (event, response) = match request {
            ReceivedRequest::Login { username, password } => match &behavior.reject_login {
                Some(reason) => (
                    CoordinatorEvent::RejectedLogin { username },
                    json!({ "status": "error", "message": reason }),
                ),
                None => (
                    CoordinatorEvent::Login { username, password },
                    json!({ "status": "ok" }),
                ),
            },
            ReceivedRequest::AddChange { change } => {
                changes += 1;
                if behavior.fail_on_change == Some(changes) {
                    (
                        CoordinatorEvent::RefusedChange(change),
                        json!({ "status": "error", "message": "change refused" }),
                    )
                } else {
                    (CoordinatorEvent::Change(change), json!({ "status": "ok" }))
                }
            }
        };
        state.lock().unwrap().events.push(event);

        let mut response = response.to_string();
        response.push('\n');
        if stream.get_mut().write_all(response.as_bytes()).await.is_err() {
            return;
        }
    }
}
