// Domain layer: reference-table records, computed reports and the ports the core depends on.

pub mod model;
pub mod ports;
pub mod report;
