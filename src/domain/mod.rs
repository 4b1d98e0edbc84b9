// Domain layer: cart model, notifications and ports (interfaces) to the outside world.

pub mod model;
pub mod notification;
pub mod ports;
