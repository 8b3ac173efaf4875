// Domain layer: scorer records, parsing policies and the store port.

pub mod model;
pub mod policy;
pub mod ports;
