// Application layer - Solver, classifiers, history store and use cases
pub mod assessment_service;
pub mod critical_current;
pub mod degradation_pattern;
pub mod history_store;
pub mod key_value_store;
pub mod stress_risk;
pub mod trend;
