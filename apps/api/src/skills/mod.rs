// Skill knowledge: the catalog (what skills exist, grouped by category)
// and the matcher (how skills are found in free text and compared).

pub mod catalog;
pub mod matcher;
