pub mod analysis;
pub mod classify;
pub mod config;
pub mod consts;
pub mod error;
pub mod file;
pub mod geo;
pub mod preview;
pub mod raster;
pub mod report;
pub mod upload;
pub mod viewport;
