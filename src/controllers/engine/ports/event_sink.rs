use crate::controllers::engine::events::EngineEvent;
use std::sync::mpsc::Sender;

pub trait EngineEventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

impl EngineEventSink for Sender<EngineEvent> {
    fn emit(&self, event: EngineEvent) {
        // A dropped receiver means nobody is listening any more.
        let _ = self.send(event);
    }
}
