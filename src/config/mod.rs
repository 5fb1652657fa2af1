pub mod capture;
pub mod driver;
pub mod environment;
pub mod evolution;
pub mod manager;
pub mod observer;
pub mod traits;

pub use capture::CaptureConfig;
pub use driver::DriverConfig;
pub use environment::EnvironmentConfig;
pub use evolution::EvolutionConfig;
pub use manager::{AppConfig, ConfigManager};
pub use observer::ObserverConfig;
pub use traits::ConfigSection;
