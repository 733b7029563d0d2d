// Resume-vs-JD analysis: scoring, insights, and the HTTP handlers that
// drive them.

pub mod analyzer;
pub mod handlers;
pub mod insights;
pub mod normalize;
pub mod roles;
pub mod scoring;
