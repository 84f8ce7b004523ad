use crate::engine::events::CaseEvent;
use crate::engine::sink::EventSink;
use anyhow::Result;

/// An in-memory event sink that records every event of a run.
///
/// Used by tests to observe the order in which cases were reported.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: Vec<CaseEvent>,
}

impl CollectingEventSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[CaseEvent] {
        &self.events
    }
}

impl EventSink for CollectingEventSink {
    fn emit(&mut self, event: &CaseEvent) -> Result<()> {
        self.events.push(event.clone());
        Ok(())
    }
}
