//! Single-task session host
//!
//! One tokio task owns the `TypedSession`; every mutation and query goes
//! through its command channel, which makes the task the serialization point
//! for the schema/instance pair. The task drains pending commands before
//! recomputing and keeps only the last schema text and last instance text of
//! each batch. Dropping the superseded middle of a burst is equivalent to
//! applying the whole suffix in order, and the published snapshot never
//! reflects a schema value a later edit already replaced.
//!
//! Snapshots publish through a watch channel with a strictly increasing
//! sequence number. The single task is the only publisher, so a stale result
//! can never overwrite a newer one.

use schemapad_editor::{
    CompletionList, CompletionOptions, DocumentEngine, DocumentRole, MarkerDecoration,
    SessionError, TypedSession,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

#[derive(Error, Debug)]
pub enum LiveError {
    /// The session task is gone; the host handle is no longer usable
    #[error("Live session closed")]
    Closed,
}

/// A full-text replacement for one of the two documents
#[derive(Debug, Clone)]
pub enum EditEvent {
    Schema(String),
    Instance(String),
}

enum Command {
    Edit(EditEvent),
    Suggest {
        role: DocumentRole,
        offset: usize,
        reply: oneshot::Sender<Option<CompletionList>>,
    },
    Settle {
        reply: oneshot::Sender<DecorationSnapshot>,
    },
}

/// Decoration state published after each committed batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationSnapshot {
    pub seq: u64,
    pub schema_markers: Vec<MarkerDecoration>,
    pub instance_markers: Vec<MarkerDecoration>,
    pub stale: bool,
}

/// Handle to a session owned by a background task.
///
/// Cheap to clone the sender side of; `subscribe` hands out independent
/// snapshot receivers.
pub struct LiveSession {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<DecorationSnapshot>,
}

impl LiveSession {
    /// Build the session synchronously, then move it onto its own task.
    /// Must be called from within a tokio runtime.
    pub fn spawn<E>(
        engine: E,
        schema_text: &str,
        instance_text: &str,
        options: CompletionOptions,
    ) -> Result<Self, SessionError>
    where
        E: DocumentEngine + Send + 'static,
        E::Value: Send + 'static,
    {
        let session = TypedSession::new(engine, schema_text, instance_text)?;

        let initial = session.project();
        let (snapshot_tx, snapshot_rx) = watch::channel(DecorationSnapshot {
            seq: 0,
            schema_markers: initial.schema_markers,
            instance_markers: initial.instance_markers,
            stale: initial.stale,
        });
        let (command_tx, command_rx) = mpsc::channel(64);

        tokio::spawn(run(session, options, command_rx, snapshot_tx));

        Ok(Self {
            commands: command_tx,
            snapshots: snapshot_rx,
        })
    }

    pub async fn edit_schema(&self, text: impl Into<String>) -> Result<(), LiveError> {
        self.send(Command::Edit(EditEvent::Schema(text.into()))).await
    }

    pub async fn edit_instance(&self, text: impl Into<String>) -> Result<(), LiveError> {
        self.send(Command::Edit(EditEvent::Instance(text.into()))).await
    }

    /// Completion query, answered after every edit queued ahead of it has
    /// been applied
    pub async fn suggest(
        &self,
        role: DocumentRole,
        offset: usize,
    ) -> Result<Option<CompletionList>, LiveError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Suggest {
            role,
            offset,
            reply,
        })
        .await?;
        response.await.map_err(|_| LiveError::Closed)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> DecorationSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Snapshot after every edit queued ahead of this call has been applied
    pub async fn settled(&self) -> Result<DecorationSnapshot, LiveError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Settle { reply }).await?;
        response.await.map_err(|_| LiveError::Closed)
    }

    /// Wait for the next published snapshot
    pub async fn changed(&mut self) -> Result<DecorationSnapshot, LiveError> {
        self.snapshots
            .changed()
            .await
            .map_err(|_| LiveError::Closed)?;
        Ok(self.snapshots.borrow_and_update().clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<DecorationSnapshot> {
        self.snapshots.clone()
    }

    async fn send(&self, command: Command) -> Result<(), LiveError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| LiveError::Closed)
    }
}

async fn run<E>(
    mut session: TypedSession<E>,
    options: CompletionOptions,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<DecorationSnapshot>,
) where
    E: DocumentEngine,
{
    let mut seq: u64 = 0;

    while let Some(first) = commands.recv().await {
        let mut batch = vec![first];
        while let Ok(command) = commands.try_recv() {
            batch.push(command);
        }

        let mut schema_text = None;
        let mut instance_text = None;
        let mut suggests = Vec::new();
        let mut settles = Vec::new();
        let mut edits = 0usize;

        for command in batch {
            match command {
                Command::Edit(EditEvent::Schema(text)) => {
                    schema_text = Some(text);
                    edits += 1;
                }
                Command::Edit(EditEvent::Instance(text)) => {
                    instance_text = Some(text);
                    edits += 1;
                }
                Command::Suggest {
                    role,
                    offset,
                    reply,
                } => suggests.push((role, offset, reply)),
                Command::Settle { reply } => settles.push(reply),
            }
        }

        // Schema first, so the instance is judged against the batch's final
        // schema value
        let mut update = None;
        if let Some(text) = schema_text {
            update = Some(session.on_schema_text_changed(&text));
        }
        if let Some(text) = instance_text {
            update = Some(session.on_instance_text_changed(&text));
        }

        if let Some(update) = update {
            seq += 1;
            tracing::debug!(seq, edits, "decoration snapshot published");
            let _ = snapshots.send(DecorationSnapshot {
                seq,
                schema_markers: update.schema_markers,
                instance_markers: update.instance_markers,
                stale: update.stale,
            });
        }

        for (role, offset, reply) in suggests {
            tracing::debug!(?role, offset, "completion query");
            let _ = reply.send(session.completions_at(role, offset, &options));
        }

        for reply in settles {
            let update = session.project();
            let _ = reply.send(DecorationSnapshot {
                seq,
                schema_markers: update.schema_markers,
                instance_markers: update.instance_markers,
                stale: update.stale,
            });
        }
    }
}
