// Domain layer: shared enums and the ports (traits) the adapters implement.

pub mod model;
pub mod ports;
