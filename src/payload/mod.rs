//! Randomized add-widget request bodies.
mod generator;


pub use generator::{
    DEFAULT_ID_LENGTH, DEFAULT_MAX_SLOTS, PayloadConfig, PayloadGenerator, Slot, WidgetRequest,
};
