// src/lib.rs

//! Meetup Scraper Library

pub mod error;
pub mod html;
pub mod models;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
