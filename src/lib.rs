// Library exports for scatterplot

pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod interaction;
pub mod page;
pub mod runtime;

// Pipeline stages
pub mod ir;
pub mod resolve;
pub mod transform;
pub mod scale;
pub mod compiler;
pub mod theme_resolve;

pub use config::{ChartConfig, OutputFormat};
pub use error::ChartError;
