pub mod catalog;
pub mod loader;
pub mod types;

pub use catalog::Catalog;
pub use loader::load_catalog;
pub use types::{Attack, Boss, Category, Chapter, Prompt, Role, Scenario, ScenarioContent};
