//! Selection resolution and list synchronization for the widget configuration

mod configurator;
pub mod popup;
pub mod reconciler;
mod resolver;
mod session;
pub mod thresholds;

pub use configurator::{ConfiguratorError, DialogResult, MapConfigurator, SeriesUpdate};
pub use resolver::DataPointSeriesResolver;
pub use session::SessionState;
pub use thresholds::Upserted;
