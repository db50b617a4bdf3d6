use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Dense team index, valid only for the registry that issued it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub usize);

impl TeamId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Interns team names to `TeamId`s in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TeamRegistry {
    names: Vec<String>,
    lookup: FxHashMap<String, TeamId>,
}

impl TeamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the existing id for `name` or registers a new one.
    pub fn intern(&mut self, name: &str) -> TeamId {
        if let Some(&id) = self.lookup.get(name) {
            return id;
        }
        let id = TeamId(self.names.len());
        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<TeamId> {
        self.lookup.get(name).copied()
    }

    pub fn name(&self, id: TeamId) -> &str {
        &self.names[id.0]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        (0..self.names.len()).map(TeamId)
    }
}

/// One row of the strength table: a team and its external coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientEntry {
    pub team: String,
    pub coefficient: f64,
}

impl CoefficientEntry {
    pub fn new(team: impl Into<String>, coefficient: f64) -> Self {
        Self {
            team: team.into(),
            coefficient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let mut registry = TeamRegistry::new();
        let inter = registry.intern("Inter");
        let psg = registry.intern("Paris Saint-Germain");
        assert_eq!(registry.intern("Inter"), inter);
        assert_eq!(inter, TeamId(0));
        assert_eq!(psg, TeamId(1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.name(psg), "Paris Saint-Germain");
        assert_eq!(registry.get("Arsenal"), None);
    }
}
