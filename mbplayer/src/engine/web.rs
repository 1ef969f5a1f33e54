use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::Result;

use super::{BackendEvent, EngineBackend, EngineId};

/// Profondeur du canal de commandes. Les rampes de fondu émettent un palier
/// par intervalle, le canal doit en absorber plusieurs rampes.
const COMMAND_CHANNEL_CAPACITY: usize = 256;
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Commande adressée à l'élément audio de la page.
///
/// Le champ `engine_id` permet à la page d'écarter les commandes visant un
/// moteur qu'elle a déjà remplacé.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EngineCommand {
    Load { engine_id: u64, url: String },
    Play { engine_id: u64 },
    Pause { engine_id: u64 },
    Stop { engine_id: u64 },
    SetVolume { engine_id: u64, level: f32 },
    Seek { engine_id: u64, seconds: f64 },
}

/// Backend audio relayé vers le navigateur.
///
/// Le serveur n'a pas de sortie audio : les commandes partent vers la page
/// ouverte par un flux SSE, et la page rapporte les événements de son élément
/// audio par un POST. Sans page connectée les commandes sont simplement
/// perdues, le site reste silencieux jusqu'à la prochaine visite.
#[derive(Debug)]
pub struct WebBackend {
    commands: broadcast::Sender<EngineCommand>,
    events: broadcast::Sender<BackendEvent>,
}

impl WebBackend {
    pub fn new() -> Self {
        let (commands, _) = broadcast::channel(COMMAND_CHANNEL_CAPACITY);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { commands, events }
    }

    /// S'abonne au flux de commandes, côté page.
    pub fn subscribe_commands(&self) -> broadcast::Receiver<EngineCommand> {
        self.commands.subscribe()
    }

    /// Injecte un événement rapporté par la page.
    pub fn report(&self, event: BackendEvent) {
        if self.events.send(event).is_err() {
            debug!("Engine event dropped, no controller subscribed");
        }
    }

    fn dispatch(&self, command: EngineCommand) -> Result<()> {
        if self.commands.send(command).is_err() {
            debug!("Engine command dropped, no page attached");
        }
        Ok(())
    }
}

impl Default for WebBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EngineBackend for WebBackend {
    async fn load(&self, id: EngineId, url: &str) -> Result<()> {
        self.dispatch(EngineCommand::Load {
            engine_id: id.0,
            url: url.to_string(),
        })
    }

    async fn play(&self, id: EngineId) -> Result<()> {
        self.dispatch(EngineCommand::Play { engine_id: id.0 })
    }

    async fn pause(&self, id: EngineId) -> Result<()> {
        self.dispatch(EngineCommand::Pause { engine_id: id.0 })
    }

    async fn stop(&self, id: EngineId) -> Result<()> {
        self.dispatch(EngineCommand::Stop { engine_id: id.0 })
    }

    async fn set_volume(&self, id: EngineId, level: f32) -> Result<()> {
        self.dispatch(EngineCommand::SetVolume {
            engine_id: id.0,
            level,
        })
    }

    async fn seek(&self, id: EngineId, seconds: f64) -> Result<()> {
        self.dispatch(EngineCommand::Seek {
            engine_id: id.0,
            seconds,
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<BackendEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commands_reach_subscribers() {
        let backend = WebBackend::new();
        let mut rx = backend.subscribe_commands();
        backend.play(EngineId(7)).await.unwrap();
        match rx.recv().await.unwrap() {
            EngineCommand::Play { engine_id } => assert_eq!(engine_id, 7),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_commands_without_page_are_dropped() {
        let backend = WebBackend::new();
        // Aucun abonné : la commande part dans le vide sans erreur.
        assert!(backend.play(EngineId(1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_reported_events_reach_controller() {
        let backend = WebBackend::new();
        let mut rx = backend.subscribe();
        backend.report(BackendEvent::Ended { id: EngineId(3) });
        match rx.recv().await.unwrap() {
            BackendEvent::Ended { id } => assert_eq!(id, EngineId(3)),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_command_wire_format() {
        let json = serde_json::to_string(&EngineCommand::SetVolume {
            engine_id: 12,
            level: 0.25,
        })
        .unwrap();
        assert_eq!(json, r#"{"command":"set_volume","engine_id":12,"level":0.25}"#);
    }
}
