// Domain layer: bank entities and the lookup port the codecs depend on.

pub mod model;
pub mod ports;
