pub mod command;
pub mod driver;
pub mod executor;

pub use command::{CommandDriver, TesseractExtractor};
pub use driver::{CaptureSource, EnvironmentDriver, TextExtractor};
pub use executor::{ActionExecutor, Reading};
