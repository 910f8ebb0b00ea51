// Commands module - the validation boundary shared by every outer surface
// Inputs are checked here; the store itself accepts whatever it is given

pub mod common;
pub mod dashboard;
pub mod project;
pub mod settings;
pub mod task;
