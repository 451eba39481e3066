//! Page Views
//!
//! The view layer of the MVU architecture. The client is a single-page
//! application: everything happens in the room view.

pub mod room;
