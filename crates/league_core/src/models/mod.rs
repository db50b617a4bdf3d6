//! Typed input records shared by every simulation stage.

pub mod fixture;
pub mod team;

pub use fixture::{Fixture, FixtureResult, Score};
pub use team::{CoefficientEntry, TeamId, TeamRegistry};
