//! Window-event input.

use std::fs;
use std::path::Path;

use fruit_catcher_game::{EventQueue, InputEvent};
use serde::{Deserialize, Serialize};

use crate::error::ScriptError;

/// Supplies the events that arrived before tick `tick`.
pub trait EventSource {
    fn poll(&mut self, tick: u64, queue: &mut EventQueue);
}

impl<E: EventSource + ?Sized> EventSource for &mut E {
    fn poll(&mut self, tick: u64, queue: &mut EventQueue) {
        (**self).poll(tick, queue)
    }
}

/// One line of an input script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub tick: u64,
    pub event: InputEvent,
}

/// Pre-recorded input: `[{"tick": 3, "event": {"pointer_click": {"x": 10, "y": 20}}}, ...]`.
///
/// Events fire on the first tick at or after their `tick`; entries with the
/// same tick keep their file order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    entries: Vec<ScriptEntry>,
    next: usize,
}

impl ScriptedInput {
    pub fn new(mut entries: Vec<ScriptEntry>) -> Self {
        entries.sort_by_key(|e| e.tick);
        Self { entries, next: 0 }
    }

    /// No input at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ScriptError> {
        let entries: Vec<ScriptEntry> = serde_json::from_str(raw)?;
        Ok(Self::new(entries))
    }

    pub fn is_exhausted(&self) -> bool {
        self.next >= self.entries.len()
    }
}

impl EventSource for ScriptedInput {
    fn poll(&mut self, tick: u64, queue: &mut EventQueue) {
        while let Some(entry) = self.entries.get(self.next) {
            if entry.tick > tick {
                break;
            }
            queue.push(entry.event);
            self.next += 1;
        }
    }
}
