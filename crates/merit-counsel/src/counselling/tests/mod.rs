mod allocation;
mod common;
mod service;
