//! # antviz Session Layer
//!
//! Headless parameter state around the [`antviz_core`] pattern engine, and
//! the `antviz` command-line front end built on it.
//!
//! ```rust,no_run
//! use antviz_core::prelude::*;
//! use antviz_sim::Session;
//!
//! let mut session = Session::new(&AntvizConfig::default())?;
//! session.set_topology(Topology::CollinearArray)?;
//! session.set_element_count(4)?;
//! println!("D = {}", session.pattern().directivity.display);
//! # Ok::<(), PatternError>(())
//! ```

pub mod session;

pub use session::{PlotFrame, Session, Snapshot, ViewMode};
