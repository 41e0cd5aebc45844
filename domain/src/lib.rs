//! Domain model for the Taroudant tourism platform client.
//!
//! The platform has three roles: tourists browse and book, guides propose
//! content, admins moderate and confirm bookings. Everything a guide
//! submits (places, activities, circuits, events, artisans) passes through
//! a PENDING → ACTIVE moderation workflow before it becomes publicly
//! visible; bookings run through their own PENDING → CONFIRMED/CANCELLED
//! machine. This crate is the single home of that contract:
//!
//! - [`types`]: identifiers, roles, statuses, reservations, reviews, reports
//! - [`entity`]: the tagged union over the five moderatable content kinds
//! - [`error`]: the lifecycle error taxonomy
//! - [`rules`]: every authorization and transition rule, as pure functions
//! - [`api`]: the traits the remote backend is reached through
//! - [`catalog`]: the entity lifecycle reducer (shared by all five kinds)
//! - [`reservation`]: the booking lifecycle reducer
//! - [`review`]: the place review reducer
//! - [`report`]: the admin report-triage reducer
//! - [`directory`]: the admin user directory reducer
//! - [`queue`]: read-side moderation queue projections

pub mod api;
pub mod catalog;
pub mod directory;
pub mod entity;
pub mod error;
pub mod queue;
pub mod report;
pub mod reservation;
pub mod review;
pub mod rules;
pub mod types;

pub use entity::{Entity, EntityDraft, EntityKey, EntityKind};
pub use error::{LifecycleError, Result};
pub use types::{Actor, EntityStatus, ReservationStatus, Role};
