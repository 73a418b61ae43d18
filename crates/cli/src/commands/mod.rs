pub mod ask;
pub mod classify;
pub mod demo;
pub mod doctor;
pub mod inputs;
pub mod onboard;
pub mod prompt;
pub mod status;
