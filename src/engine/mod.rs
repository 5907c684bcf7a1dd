// Relay Engine
//
// browser drag → page script → /ws frame → decoder → action sink → host

pub mod config;
pub mod decoder;
pub mod input;
pub mod page;
pub mod server;
pub mod sinks;
