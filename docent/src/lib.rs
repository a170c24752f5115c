//! Documentation answering backend.
//!
//! Sits between a documentation site's search UI and an OpenAI-compatible
//! model: classifies incoming queries, grounds the model on caller-supplied
//! documents and community sources, and scores every generated answer
//! before it goes back out.

pub mod aggregate;
pub mod answer;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod services;
