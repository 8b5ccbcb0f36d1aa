//! # Timeline Parsing
//!
//! Turns the caller's loosely-typed effect items into validated, time-sorted
//! [`EffectSpec`]s.
//!
//! ```rust
//! use fxgraph::timeline::{EffectItem, EffectParser};
//!
//! let items = vec![EffectItem::from("3 5 gblur"), EffectItem::from("0 3 fade in 1.0")];
//! let specs = EffectParser::new().parse(&items).unwrap();
//!
//! assert_eq!(specs[0].kind, "fade");
//! assert_eq!(specs[1].start, 3.0);
//! ```

pub mod parser;
pub mod types;

pub use parser::EffectParser;
pub use types::{EffectItem, EffectSpec, TimeWindow};
