// Copyright 2026 the Regio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planar curved-region algebra.
//!
//! This crate is a computational-geometry kernel for vector graphics:
//! line, quadratic and cubic Bézier segments are grouped into closed
//! [`Ring`]s and [`Region`]s, the kernel computes robust intersections
//! between curves, performs set operations (union, intersection,
//! difference) on curved regions, and rasterizes multi-channel signed
//! distance fields ([`DistanceField`]) for antialiased rendering of
//! filled curved shapes such as font glyphs.
//!
//! # Examples
//!
//! Boolean operations on regions:
//!
//! ```
//! use regio::{Curve, Point, Ring};
//!
//! let square = Ring::square().region();
//! let shifted = Ring::new(vec![
//!     Curve::line((0.5, 0.5), (1.5, 0.5)),
//!     Curve::line((1.5, 0.5), (1.5, 1.5)),
//!     Curve::line((1.5, 1.5), (0.5, 1.5)),
//!     Curve::line((0.5, 1.5), (0.5, 0.5)),
//! ])
//! .unwrap()
//! .region();
//!
//! let union = square.union(&shifted);
//! assert!(union.contains(Point::new(0.25, 0.25)));
//! assert!(union.contains(Point::new(1.25, 1.25)));
//! assert!((union.area() - 1.75).abs() < 1e-4);
//! ```
//!
//! Curve queries:
//!
//! ```
//! use regio::{Curve, Point};
//!
//! let arch = Curve::quad((0.0, 0.0), (0.5, 1.0), (1.0, 0.0));
//! let floor = Curve::line((0.0, 0.25), (1.0, 0.25));
//! assert_eq!(arch.intersections(&floor).len(), 2);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision
)]

mod clip;
pub mod common;
mod cubicbez;
mod curve;
mod distance_field;
mod error;
mod graph;
mod intersect;
mod interval;
mod line;
mod point;
mod quadbez;
mod rect;
mod region;
mod ring;
mod split;
mod sweep;
mod vec2;

pub use crate::clip::BoolOp;
pub use crate::cubicbez::CubicBez;
pub use crate::curve::Curve;
pub use crate::distance_field::{median, Channels, DistanceField};
pub use crate::error::Error;
pub use crate::intersect::{
    intersections, subdivision_intersections, MAX_INTERSECTIONS, PARAMETRIC_EPSILON,
    SPATIAL_EPSILON,
};
pub use crate::interval::Interval;
pub use crate::line::Line;
pub use crate::point::Point;
pub use crate::quadbez::QuadBez;
pub use crate::rect::Rect;
pub use crate::region::Region;
pub use crate::ring::{Membership, Ring};
pub use crate::vec2::Vec2;
