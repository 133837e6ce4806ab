//! # Events Module
//!
//! Progress reporting for long-running library operations.
//!
//! ## Design
//! The library emits events through channels, so any front end
//! (CLI, GUI, web) can subscribe and display import progress.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Import(ImportEvent::Progress(p)) = event {
//!             println!("Imported {}/{}", p.completed, p.total);
//!         }
//!     }
//! });
//!
//! service.create_node_with_events(request, &sender, &CancellationToken::new())?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
