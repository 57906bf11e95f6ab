// Domain layer: catalog models and ports (interfaces). No external dependencies beyond serde/chrono.

pub mod model;
pub mod ports;
