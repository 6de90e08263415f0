// Library for tests to access modules

pub mod config;
pub mod constructor;
pub mod model;
pub mod routes;
pub mod source;
pub mod timeseries;
pub mod version;
pub mod views;
pub mod widgets;
pub mod worker;
