pub mod advisory;
pub mod diagnosis;
pub mod enums;
pub mod history;
pub mod settings;

pub use advisory::*;
pub use diagnosis::*;
pub use enums::*;
pub use history::*;
pub use settings::*;
