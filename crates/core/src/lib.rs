//! Core of the bubblescope dashboard: CSV normalization, filter composition,
//! the selection store, the brush mapping and the chart views that turn a
//! selection into render commands.

pub mod brush;
pub mod config;
pub mod coordinator;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod model;
pub mod parsers;
pub mod scale;
pub mod state;
pub mod svg;
pub mod views;

pub use config::DashboardConfig;
pub use dashboard::{ChartDashboard, Dashboard};
pub use error::{ConfigError, LoadError, SelectionError};
