use crate::clients::DirectoryClient;
use crate::config::DirectoryConfig;
use crate::directory::{self, DirectoryError};
use crate::notify::{Notification, Notifier};
use crate::remote::{HttpUserResource, RemoteError, UserResource};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

/// The runtime orchestrator for the directory console.
///
/// `DirectorySystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping the Directory actor
/// - **Dependency Wiring**: Handing the actor its remote resource and notifier
///
/// # Example
///
/// ```ignore
/// let mut system = DirectorySystem::new(&config)?;
///
/// let state = system.client.load_page(1).await?;
/// while let Ok(toast) = system.notifications.try_recv() { /* show it */ }
///
/// system.shutdown().await?;
/// ```
pub struct DirectorySystem {
    /// Client for interacting with the Directory actor
    pub client: DirectoryClient,

    /// Success and failure notifications raised by the actor
    pub notifications: mpsc::UnboundedReceiver<Notification>,

    handle: tokio::task::JoinHandle<()>,
}

impl DirectorySystem {
    /// Starts a system talking to the HTTP resource at `config.base_url`.
    pub fn new(config: &DirectoryConfig) -> Result<Self, RemoteError> {
        let resource = HttpUserResource::new(config.base_url.clone())?;
        info!(base_url = %config.base_url, "Using remote user resource");
        Ok(Self::with_resource(config, Arc::new(resource)))
    }

    /// Starts a system on top of any resource, typically a mock in tests.
    pub fn with_resource(config: &DirectoryConfig, resource: Arc<dyn UserResource>) -> Self {
        let (notifier, notifications) = Notifier::channel();
        let (actor, client) = directory::new(config, resource, notifier);
        let handle = tokio::spawn(actor.run());

        Self {
            client,
            notifications,
            handle,
        }
    }

    /// Gracefully shuts down the actor.
    ///
    /// Dropping the client closes the mailbox. The actor still applies whatever
    /// remote calls are outstanding, then exits. Clones of the client held
    /// elsewhere keep it alive until they are dropped too.
    pub async fn shutdown(self) -> Result<(), DirectoryError> {
        info!("Shutting down directory...");
        drop(self.client);

        if let Err(e) = self.handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(DirectoryError::ActorFailed(e.to_string()));
        }

        info!("Directory shutdown complete.");
        Ok(())
    }
}
