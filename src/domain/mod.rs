// Domain layer: connection/schema models and the catalog port.

pub mod model;
pub mod ports;
