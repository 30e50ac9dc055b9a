pub mod automations;
pub mod simulate;
