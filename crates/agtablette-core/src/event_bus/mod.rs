//! # Event Bus Module
//!
//! Publish/subscribe channel between the geometry core and whatever
//! front end drives it.
//!
//! ## Overview
//!
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter by category and are called synchronously
//!
//! There is no global instance: the application context owns the bus
//! and hands it to the components that publish.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agtablette_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter, WorkspaceEvent};
//!
//! let bus = EventBus::new();
//! bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Workspace]),
//!     |event| {
//!         if let AppEvent::Workspace(WorkspaceEvent::CanvasReady) = event {
//!             println!("ready");
//!         }
//!     },
//! );
//! assert_eq!(bus.publish(AppEvent::Workspace(WorkspaceEvent::CanvasReady)), 1);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
