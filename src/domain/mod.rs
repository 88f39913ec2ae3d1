pub mod analytics;
pub mod entities;
pub mod ports;
pub mod rules;
pub mod value_objects;
