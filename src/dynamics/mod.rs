//! Simulation dynamics: integration, contact response and springs.

pub mod integrator;
pub mod solver;
pub mod spring;

pub use integrator::Integrator;
pub use solver::ContactSolver;
pub use spring::Spring;
