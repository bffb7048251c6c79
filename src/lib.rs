pub mod board;
pub mod calendar;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod models;
pub mod storage;
