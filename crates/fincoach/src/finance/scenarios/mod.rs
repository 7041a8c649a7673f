//! Saved what-if scenarios and the net-worth projection engine.

pub mod domain;
pub mod projection;

pub use domain::{
    NewScenarioRequest, ScenarioConfig, ScenarioEnvelope, ScenarioId, ScenarioOverrides,
    ScenarioUpdate, SimulateRequest,
};
pub use projection::{
    project, trajectory, PlanInputs, Projection, ProjectionPoint, SimulationResponse,
    DEFAULT_PROJECTION_YEARS, MAX_PROJECTION_YEARS,
};
