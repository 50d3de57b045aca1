pub mod model;

pub use model::{Authority, Info, Report, Status};
