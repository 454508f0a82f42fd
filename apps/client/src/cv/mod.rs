// CV document tooling: schema, field validation, completeness scoring.
// Documents are client-local form state; nothing here talks to the network.

pub mod completeness;
pub mod models;
pub mod validation;
