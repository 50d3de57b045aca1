pub mod authorities;
pub mod classify;
pub mod extract;
pub mod inspect;
pub mod requirements;
pub mod resolve;

pub use inspect::{InspectConfig, inspect_with};
pub use requirements::trim_requirements;
