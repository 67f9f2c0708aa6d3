//! Raw Recharge records
//!
//! Each list resource decodes into an explicit record type: the fields the
//! flatteners treat specially are named, everything else lands in an open
//! `fields` bag so that new upstream keys are visible instead of silently
//! changing the table shape.

mod types;

pub use types::{LineItem, Order, Record, Resource, Subscription};
