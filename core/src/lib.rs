//! Game and drawing logic for the Magic Pals learning app.
//!
//! Nothing here touches the browser: the front end feeds input events in and renders the state
//! it reads back out. Collaborators that do I/O are reached through [`Studio`].

#![no_std]

extern crate alloc;

pub use catalog::*;
pub use drawing::*;
pub use error::*;
pub use flipbook::*;
pub use generator::*;
pub use narration::*;
pub use puzzle::*;
pub use session::*;
pub use studio::*;
pub use symbol::*;
pub use ticket::*;
pub use types::*;

mod catalog;
mod drawing;
mod error;
mod flipbook;
mod generator;
mod narration;
mod puzzle;
mod session;
mod studio;
mod symbol;
mod ticket;
mod types;
