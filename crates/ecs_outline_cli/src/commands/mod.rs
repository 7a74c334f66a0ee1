//! Command implementations for ecs-outline

pub mod locate;
pub mod scan;
