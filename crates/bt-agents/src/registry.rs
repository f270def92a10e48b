//! Explicit cross-agent lookup.
//!
//! Agents never reach into each other directly. The world publishes a
//! snapshot of every agent into the [`Registry`] each frame, and agents read
//! what they need from it before ticking their trees.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{AgentError, Result, Vec2};

/// Read-only view of one agent at the time it was published.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentSnapshot {
    pub id: u64,
    pub name: String,
    pub position: Vec2,
    pub ball_count: u32,
}

#[derive(Debug, Default, Clone)]
pub struct Registry {
    agents: BTreeMap<u64, AgentSnapshot>,
    names: BTreeMap<String, u64>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new agent.
    ///
    /// # Errors
    ///
    /// [`AgentError::DuplicateAgent`] if the id or the name is already taken.
    pub fn register(&mut self, snapshot: AgentSnapshot) -> Result<()> {
        if let Some(existing) = self.agents.get(&snapshot.id) {
            return Err(AgentError::DuplicateAgent {
                id: snapshot.id,
                existing: existing.name.clone(),
            });
        }
        if let Some(&id) = self.names.get(&snapshot.name) {
            return Err(AgentError::DuplicateAgent {
                id,
                existing: snapshot.name,
            });
        }
        self.names.insert(snapshot.name.clone(), snapshot.id);
        self.agents.insert(snapshot.id, snapshot);
        Ok(())
    }

    /// Replaces the snapshot of an already registered agent.
    ///
    /// # Errors
    ///
    /// [`AgentError::UnknownAgent`] if the id was never registered.
    pub fn publish(&mut self, snapshot: AgentSnapshot) -> Result<()> {
        let Some(slot) = self.agents.get_mut(&snapshot.id) else {
            return Err(AgentError::UnknownAgent(snapshot.name));
        };
        if slot.name != snapshot.name {
            self.names.remove(&slot.name);
            self.names.insert(snapshot.name.clone(), snapshot.id);
        }
        *slot = snapshot;
        Ok(())
    }

    pub fn get(&self, id: u64) -> Option<&AgentSnapshot> {
        self.agents.get(&id)
    }

    pub fn by_name(&self, name: &str) -> Option<&AgentSnapshot> {
        self.names.get(name).and_then(|id| self.agents.get(id))
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.agents.values()
    }
}
