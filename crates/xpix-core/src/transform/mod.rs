//! Transform pipeline: adjustment parameters, tone primitives and the
//! stage orchestrator.

pub mod evaluate;
pub mod parallel;
pub mod params;
pub mod sharpen;
pub mod tone;
