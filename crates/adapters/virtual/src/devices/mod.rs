//! Virtual device behaviour: switch services and the room thermal model.

mod sensor;
mod switch;

pub use sensor::ThermalModel;
pub use switch::SwitchService;
