//! FrameDecoded API: explanatory film and TV analysis backed by a title
//! metadata catalog and two generative engines (primary with fallback).

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
