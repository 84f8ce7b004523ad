use crate::engine::events::CaseEvent;
use anyhow::Result;

pub trait EventSink: Send {
    fn emit(&mut self, event: &CaseEvent) -> Result<()>;
}
