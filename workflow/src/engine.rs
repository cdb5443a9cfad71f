//! Workflow engine — applies classified events to the session store.
//!
//! The engine is one state machine over {no pending photo, pending
//! confirmation} composed with two registries (verifier set and latest
//! archived photo). Every event is handled under a single lock that is held
//! across the archival call, so a new photo can never race an in-flight
//! confirmation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use witness_gateway::{ArchivalGateway, GatewayError, PayloadLoader};
use witness_types::{
    ArchivedPhoto, Attachment, Cid, Decision, Identity, InboundEvent, OutboundMessage,
    PendingPhoto, VerificationOutcome,
};

use crate::command::Command;
use crate::error::CommandError;
use crate::replies;
use crate::rewards::reward_notices;
use crate::router::{classify, Inbound};
use crate::session::SessionStore;

/// Default bound on one archival (payload load + upload).
pub const DEFAULT_ARCHIVE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Expiry is treated as a gateway failure.
    pub archive_timeout: Duration,
    /// Tell registered verifiers when a new photo has been archived.
    pub notify_verifiers: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            archive_timeout: DEFAULT_ARCHIVE_TIMEOUT,
            notify_verifiers: true,
        }
    }
}

/// Result of handling one inbound event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Messages to deliver, replies to the sender first.
    pub messages: Vec<OutboundMessage>,
    /// Set when a verifier's decision was accepted.
    pub outcome: Option<VerificationOutcome>,
}

impl Dispatch {
    fn reply(to: &Identity, body: impl Into<String>) -> Self {
        Self {
            messages: vec![OutboundMessage::new(to.clone(), body)],
            outcome: None,
        }
    }

    fn none() -> Self {
        Self::default()
    }

    /// Bodies of the messages addressed to `recipient`, in order. For callers
    /// that inspect replies, such as the conversation tests and embedders that
    /// render one participant's view.
    pub fn bodies_for(&self, recipient: &Identity) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|m| &m.recipient == recipient)
            .map(|m| m.body.as_str())
            .collect()
    }
}

pub struct WorkflowEngine {
    store: Mutex<SessionStore>,
    gateway: Arc<dyn ArchivalGateway>,
    loader: Arc<dyn PayloadLoader>,
    config: EngineConfig,
}

impl WorkflowEngine {
    pub fn new(
        gateway: Arc<dyn ArchivalGateway>,
        loader: Arc<dyn PayloadLoader>,
        config: EngineConfig,
    ) -> Self {
        Self::with_store(SessionStore::new(), gateway, loader, config)
    }

    /// Start from an existing session state.
    pub fn with_store(
        store: SessionStore,
        gateway: Arc<dyn ArchivalGateway>,
        loader: Arc<dyn PayloadLoader>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store: Mutex::new(store),
            gateway,
            loader,
            config,
        }
    }

    /// A copy of the current session state.
    pub async fn session(&self) -> SessionStore {
        self.store.lock().await.clone()
    }

    /// Handle one inbound event. Never fails: every error is turned into a
    /// reply to the originating conversation.
    pub async fn handle(&self, event: &InboundEvent) -> Dispatch {
        if !event.sender.is_valid() {
            tracing::warn!("dropping event without a sender identity");
            return Dispatch::none();
        }

        let mut store = self.store.lock().await;
        let inbound = classify(event, store.pending().map(|p| &p.submitter));
        let sender = &event.sender;

        match inbound {
            Inbound::Photo(attachment) => self.on_photo(&mut store, sender, attachment),
            Inbound::Ignored { rejected } => {
                tracing::debug!(%sender, rejected, "ignoring attachments that are not PNG/JPEG");
                Dispatch::none()
            }
            Inbound::Empty => {
                tracing::debug!(%sender, "received event whose body and attachments are empty");
                Dispatch::none()
            }
            Inbound::Confirmation(true) => self.on_archive_confirmed(&mut store, sender).await,
            Inbound::Confirmation(false) => {
                if let Some(photo) = store.clear_pending() {
                    tracing::info!(%sender, reference = %photo.reference, "archive declined");
                }
                Dispatch::reply(sender, replies::ARCHIVE_DECLINED)
            }
            Inbound::Command(Command::Register) => {
                let added = store.add_verifier(sender.clone());
                tracing::info!(
                    %sender,
                    added,
                    verifiers = store.verifier_count(),
                    "verifier registration"
                );
                Dispatch::reply(sender, replies::registered(sender))
            }
            Inbound::Command(Command::Verify) => self.on_verify(&store, sender),
            Inbound::Command(Command::Decide(decision)) => {
                self.on_decision(&store, sender, decision)
            }
            Inbound::Malformed(err) => self.on_malformed(sender, err),
            Inbound::Echo(text) => Dispatch::reply(sender, text),
        }
    }

    fn on_photo(
        &self,
        store: &mut SessionStore,
        sender: &Identity,
        attachment: Attachment,
    ) -> Dispatch {
        let photo = PendingPhoto {
            content_type: attachment.mime_type(),
            reference: attachment.reference,
            submitter: sender.clone(),
        };
        tracing::info!(%sender, reference = %photo.reference, "photo received");
        if let Some(previous) = store.set_pending(photo) {
            tracing::debug!(
                reference = %previous.reference,
                submitter = %previous.submitter,
                "replaced unconfirmed photo"
            );
        }
        Dispatch::reply(sender, replies::ARCHIVE_PROMPT)
    }

    async fn on_archive_confirmed(&self, store: &mut SessionStore, sender: &Identity) -> Dispatch {
        let Some(pending) = store.pending().cloned() else {
            return Dispatch::none();
        };

        match self.archive(&pending).await {
            Ok(cid) => {
                let url = self.gateway.public_url(&cid);
                tracing::info!(%sender, cid = %cid, %url, gateway = self.gateway.name(), "photo archived");

                store.set_archived(ArchivedPhoto {
                    cid,
                    url: url.clone(),
                    submitter: pending.submitter.clone(),
                });
                store.clear_pending();

                let mut dispatch = Dispatch::reply(sender, replies::archived(&url));
                if self.config.notify_verifiers {
                    dispatch.messages.extend(
                        store
                            .verifiers()
                            .filter(|v| *v != &pending.submitter)
                            .map(|v| OutboundMessage::new(v.clone(), replies::new_photo_notice(&url))),
                    );
                }
                dispatch
            }
            Err(err) => {
                tracing::warn!(
                    %sender,
                    reference = %pending.reference,
                    error = %err,
                    "archival failed; photo kept pending"
                );
                Dispatch::reply(sender, replies::archive_failed(&err))
            }
        }
    }

    /// Load and upload the pending photo within the configured time bound.
    async fn archive(&self, pending: &PendingPhoto) -> Result<Cid, GatewayError> {
        let work = async {
            let payload = self.loader.load(pending).await?;
            self.gateway.archive(payload).await
        };
        tokio::time::timeout(self.config.archive_timeout, work)
            .await
            .map_err(|_| GatewayError::Timeout(self.config.archive_timeout))?
    }

    fn on_verify(&self, store: &SessionStore, sender: &Identity) -> Dispatch {
        if !store.is_verifier(sender) {
            tracing::debug!(%sender, "verify request from unregistered identity");
            return Dispatch::reply(sender, replies::REGISTRATION_PROMPT);
        }
        match store.archived() {
            Some(photo) => Dispatch::reply(sender, replies::review_request(&photo.url)),
            None => Dispatch::reply(sender, replies::NOTHING_TO_VERIFY),
        }
    }

    fn on_decision(&self, store: &SessionStore, sender: &Identity, decision: Decision) -> Dispatch {
        if !store.is_verifier(sender) {
            tracing::debug!(%sender, %decision, "decision from unregistered identity");
            return Dispatch::reply(sender, replies::REGISTRATION_PROMPT);
        }
        let Some(photo) = store.archived() else {
            return Dispatch::reply(sender, replies::NOTHING_TO_VERIFY);
        };

        let outcome = VerificationOutcome {
            verifier: sender.clone(),
            submitter: photo.submitter.clone(),
            target_cid: photo.cid.clone(),
            decision,
        };
        tracing::info!(
            verifier = %outcome.verifier,
            submitter = %outcome.submitter,
            cid = %outcome.target_cid,
            decision = %outcome.decision,
            "verification outcome"
        );

        let mut messages = vec![OutboundMessage::new(
            sender.clone(),
            replies::decision_recorded(&outcome),
        )];
        messages.extend(reward_notices(&outcome).into_iter().map(OutboundMessage::from));

        Dispatch {
            messages,
            outcome: Some(outcome),
        }
    }

    fn on_malformed(&self, sender: &Identity, err: CommandError) -> Dispatch {
        tracing::debug!(%sender, error = %err, "malformed command");
        Dispatch::reply(sender, replies::usage(err.usage()))
    }
}
