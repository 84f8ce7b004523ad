use crate::engine::events::CaseEvent;
use crate::engine::sink::EventSink;
use anyhow::Result;

/// Forwards every event to each inner sink, in order.
pub struct FanoutSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Box<dyn EventSink>>) -> Self {
        Self { sinks }
    }
}

impl EventSink for FanoutSink {
    fn emit(&mut self, event: &CaseEvent) -> Result<()> {
        for sink in &mut self.sinks {
            sink.emit(event)?;
        }
        Ok(())
    }
}
