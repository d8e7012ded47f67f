//! Ordered store of agent definitions.
//!
//! Unlike a name-keyed registry, the store keeps insertion order: the chain
//! executor runs agents in exactly the order returned by [`AgentStore::agents`].
//! Edits happen between runs; a run works on its own snapshot of the list.

use crate::agents::{default_agents, AgentSpec};
use crate::types::{AppError, Result};

/// Ordered, editable list of agents
#[derive(Debug, Clone, PartialEq)]
pub struct AgentStore {
    agents: Vec<AgentSpec>,
}

impl Default for AgentStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl AgentStore {
    /// Create a store from an explicit list.
    ///
    /// Every agent is validated and ids must be unique.
    pub fn new(agents: Vec<AgentSpec>) -> Result<Self> {
        let mut store = Self { agents: Vec::with_capacity(agents.len()) };
        for agent in agents {
            store.push(agent)?;
        }
        Ok(store)
    }

    /// Create a store holding the built-in review pipeline
    pub fn with_defaults() -> Self {
        Self {
            agents: default_agents(),
        }
    }

    /// Agents in execution order
    pub fn agents(&self) -> &[AgentSpec] {
        &self.agents
    }

    /// Owned copy of the current list, for handing to a chain run
    pub fn snapshot(&self) -> Vec<AgentSpec> {
        self.agents.clone()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Get an agent by id
    pub fn get(&self, id: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Append an agent to the end of the chain
    pub fn push(&mut self, agent: AgentSpec) -> Result<()> {
        agent.validate()?;
        if self.get(&agent.id).is_some() {
            return Err(AppError::Validation(format!(
                "Agent id '{}' is already defined",
                agent.id
            )));
        }
        self.agents.push(agent);
        Ok(())
    }

    /// Edit an agent in place.
    ///
    /// The edit is applied to a copy and only stored if the result still
    /// validates and keeps the same id.
    pub fn update<F>(&mut self, id: &str, edit: F) -> Result<&AgentSpec>
    where
        F: FnOnce(&mut AgentSpec),
    {
        let index = self
            .agents
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| AppError::Validation(format!("Agent '{}' not found", id)))?;

        let mut edited = self.agents[index].clone();
        edit(&mut edited);

        if edited.id != id {
            return Err(AppError::Validation(format!(
                "Agent id '{}' cannot be changed",
                id
            )));
        }
        edited.validate()?;

        self.agents[index] = edited;
        Ok(&self.agents[index])
    }

    /// Remove an agent, returning it
    pub fn remove(&mut self, id: &str) -> Option<AgentSpec> {
        let index = self.agents.iter().position(|a| a.id == id)?;
        Some(self.agents.remove(index))
    }

    /// Discard all edits and restore the built-in pipeline
    pub fn reset(&mut self) {
        tracing::info!("Resetting agent list to defaults");
        self.agents = default_agents();
    }
}
