pub mod applications;
pub mod probes;
pub mod ui;
