pub mod hubspot;
pub mod wire;
