//! Tracked-player roster and identity resolution.
//!
//! The roster is a read-only configuration file enumerating the players worth
//! tracking. It is loaded once per process into an immutable [`Roster`] value
//! that every filter/sort/report step receives explicitly.
//!
//! Two identifier namespaces hang off one roster entry and must not be
//! conflated:
//! - the **remote id** (`platform:id`) the listing endpoint filters by
//! - the **store id** (bare `id`) embedded in replay player entries

pub mod roster;

pub use roster::{Roster, TrackedEntity};
