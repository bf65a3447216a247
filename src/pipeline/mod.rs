//! The analysis pipeline, in call order: resolve the image reference, call
//! the vision model, normalise the response text into the question envelope.

pub mod input;
pub mod llm;
pub mod normalize;
