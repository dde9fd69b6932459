//! Shared test infrastructure.
//!
//! Map-backed listeners, a scripted transport, and helpers for spinning up
//! an in-process agent on a loopback port.

// Not every test file uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod listener;
pub mod mock;

use std::sync::Arc;
use std::time::Duration;

use snmpv1::{Agent, Client, RequestListener, UdpTransport};

pub use listener::{FailingListener, MapListener, StuckListener};
pub use mock::MockTransport;

/// Build and start an agent on a loopback port with the given listeners.
pub async fn spawn_agent(listeners: Vec<Arc<dyn RequestListener>>) -> Agent {
    let mut builder = Agent::builder().bind("127.0.0.1:0");
    for listener in listeners {
        builder = builder.listener(listener);
    }
    let agent = builder.build().await.expect("bind agent");
    agent.spawn();
    agent
}

/// Client pointed at an in-process agent, with a test-friendly timeout.
pub async fn client_for(agent: &Agent) -> Client<UdpTransport> {
    Client::builder(agent.local_addr().to_string())
        .community("public")
        .timeout(Duration::from_secs(2))
        .connect()
        .await
        .expect("connect client")
}
