//! Arena of agent records for one round, indexed by population position.

use evoplat_data::{Agent, AgentStatus, Population, Position};

#[derive(Debug, Clone, Default)]
pub struct AgentStore {
    agents: Vec<Agent>,
}

impl AgentStore {
    /// One fresh agent per candidate, all at `spawn`.
    #[must_use]
    pub fn from_population(population: &Population, spawn: Position) -> Self {
        Self {
            agents: population
                .iter()
                .enumerate()
                .map(|(i, moves)| Agent::new(i, moves.clone(), spawn))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut()
    }

    #[must_use]
    pub fn terminal_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_terminal()).count()
    }

    #[must_use]
    pub fn count_status(&self, status: AgentStatus) -> usize {
        self.agents.iter().filter(|a| a.status() == status).count()
    }

    #[must_use]
    pub fn all_terminal(&self) -> bool {
        self.agents.iter().all(Agent::is_terminal)
    }
}
