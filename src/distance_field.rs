// Copyright 2026 the Regio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-channel signed distance fields.
//!
//! Each curve of a region is assigned a subset of the R/G/B channels by
//! corner analysis, and each pixel stores, per channel, the minimum
//! signed pseudo-distance over the curves carrying that channel. Taking
//! the median of the three channels when sampling reconstructs sharp
//! corners that a single-channel field would round off.

use std::cmp::Ordering;

use crate::{Curve, Error, Point, Rect, Region, Ring, Vec2};

bitflags::bitflags! {
    /// The color channels a curve contributes distance to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Channels: u8 {
        /// The red channel.
        const RED = 1;
        /// The green channel.
        const GREEN = 1 << 1;
        /// The blue channel.
        const BLUE = 1 << 2;
        /// Red and green.
        const YELLOW = Self::RED.bits() | Self::GREEN.bits();
        /// Red and blue.
        const MAGENTA = Self::RED.bits() | Self::BLUE.bits();
        /// Green and blue.
        const CYAN = Self::GREEN.bits() | Self::BLUE.bits();
        /// All three channels.
        const WHITE = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
    }
}

/// The median of three values.
pub fn median(a: f64, b: f64, c: f64) -> f64 {
    f64::max(f64::min(a, b), f64::min(f64::max(a, b), c))
}

/// The signed (pseudo-)distance from a query point to one curve.
///
/// When the nearest parameter falls outside [0, 1], the perpendicular
/// distance to the endpoint tangent is used instead, but only if the
/// overshoot direction agrees with the side of the endpoint the query
/// is on; otherwise the plain endpoint distance stands.
#[derive(Clone, Copy, Debug)]
struct SignedDistance {
    dist_sq: f64,
    pseudo_dist_sq: f64,
    dot: f64,
    inside: bool,
}

impl SignedDistance {
    fn new(curve: &Curve, origin: Point) -> SignedDistance {
        let param = curve.nearest_t(origin);
        let clamped = param.clamp(0.0, 1.0);
        let pos = curve.eval(clamped);
        let dir = curve.tangent(clamped).normalize();
        let po = origin - pos;

        let dist_sq = po.hypot2();
        let inside = dir.cross(po) > 0.0;

        let (dot, pseudo_dist_sq);
        if param == clamped {
            dot = 0.0;
            pseudo_dist_sq = -1.0;
        } else {
            let ts = po.dot(dir);
            dot = dir.dot(po.normalize()).abs();

            if ts != 0.0 && ts.signum() == param.signum() {
                let pseudo = po.cross(dir);
                pseudo_dist_sq = pseudo * pseudo;
            } else {
                pseudo_dist_sq = -1.0;
            }
        }

        SignedDistance {
            dist_sq,
            pseudo_dist_sq,
            dot,
            inside,
        }
    }

    fn distance_squared(&self) -> f64 {
        if self.pseudo_dist_sq > 0.0 && self.pseudo_dist_sq < self.dist_sq {
            self.pseudo_dist_sq
        } else {
            self.dist_sq
        }
    }

    fn distance(&self) -> f64 {
        self.distance_squared().sqrt() * if self.inside { 1.0 } else { -1.0 }
    }

    /// Ordered by true squared distance, ties broken toward the curve
    /// whose tangent is more orthogonal to the offset.
    fn cmp(&self, other: &SignedDistance) -> Ordering {
        self.dist_sq
            .total_cmp(&other.dist_sq)
            .then(self.dot.total_cmp(&other.dot))
    }
}

struct FieldCurve {
    curve: Curve,
    bounds: Rect,
    color: Channels,
}

/// An immutable width × height × 3 grid of signed distances around a
/// region.
#[derive(Clone, Debug)]
pub struct DistanceField {
    data: Vec<[f32; 3]>,
    width: usize,
    height: usize,
    shape_bounds: Rect,
    field_bounds: Rect,
}

impl DistanceField {
    /// Build a field over `region` at `sample_frequency` pixels per
    /// unit, with the default padding of 4 pixels and a corner
    /// threshold of 3 degrees.
    pub fn new(region: &Region, sample_frequency: f64) -> Result<DistanceField, Error> {
        Self::with_options(region, 4, sample_frequency, 3.0_f64.to_radians())
    }

    /// Build a field with explicit padding (in pixels) and corner angle
    /// threshold (in radians).
    pub fn with_options(
        region: &Region,
        padding: usize,
        sample_frequency: f64,
        corner_angle_threshold: f64,
    ) -> Result<DistanceField, Error> {
        if !(sample_frequency > 0.0) {
            return Err(Error::InvalidSampleFrequency(sample_frequency));
        }
        let shape_bounds = region.bounds();
        let size = shape_bounds.size();
        let width = (size.x * sample_frequency).ceil() as usize;
        let height = (size.y * sample_frequency).ceil() as usize;
        if width == 0 || height == 0 {
            return Err(Error::EmptyRegion);
        }

        let pixel_size = Vec2::new(size.x / width as f64, size.y / height as f64);
        let field_bounds = shape_bounds.inflate(
            pixel_size.x * padding as f64,
            pixel_size.y * padding as f64,
        );

        let mut curves = Vec::new();
        for ring in region.rings() {
            for (curve, color) in edge_colors(ring, corner_angle_threshold) {
                curves.push(FieldCurve {
                    bounds: curve.bounds(),
                    curve,
                    color,
                });
            }
        }

        let mut data = vec![[0.0_f32; 3]; width * height];
        for y in 0..height {
            for x in 0..width {
                let tx = (x as f64 + 0.5) / (width as f64 + 1.0);
                let ty = (y as f64 + 0.5) / (height as f64 + 1.0);
                let p = field_bounds.lerp_within(tx, ty);

                let mut best: [Option<SignedDistance>; 3] = [None, None, None];
                for fc in &curves {
                    // the curve cannot improve any channel if its box is
                    // already farther than every current best
                    let ds = fc.bounds.distance_squared(p);
                    if best
                        .iter()
                        .all(|b| b.map_or(false, |b| ds >= b.dist_sq))
                    {
                        continue;
                    }

                    let d = SignedDistance::new(&fc.curve, p);
                    for (channel, mask) in
                        [Channels::RED, Channels::GREEN, Channels::BLUE].iter().enumerate()
                    {
                        if fc.color.contains(*mask)
                            && best[channel].map_or(true, |b| d.cmp(&b) == Ordering::Less)
                        {
                            best[channel] = Some(d);
                        }
                    }
                }

                data[y * width + x] = [
                    best[0].map_or(0.0, |d| d.distance()) as f32,
                    best[1].map_or(0.0, |d| d.distance()) as f32,
                    best[2].map_or(0.0, |d| d.distance()) as f32,
                ];
            }
        }

        fix_clashes(&mut data, width, height, (0.0, 0.0));

        Ok(DistanceField {
            data,
            width,
            height,
            shape_bounds,
            field_bounds,
        })
    }

    /// The grid width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The grid height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The bounds of the source region.
    pub fn shape_bounds(&self) -> Rect {
        self.shape_bounds
    }

    /// The bounds covered by the field, including padding.
    pub fn field_bounds(&self) -> Rect {
        self.field_bounds
    }

    /// The raw row-major width × height × 3 grid.
    pub fn data(&self) -> &[[f32; 3]] {
        &self.data
    }

    /// The stored channels of one pixel.
    pub fn channels(&self, x: usize, y: usize) -> [f32; 3] {
        self.data[y * self.width + x]
    }

    fn pixel(&self, x: usize, y: usize) -> [f64; 3] {
        let p = self.data[y * self.width + x];
        [p[0] as f64, p[1] as f64, p[2] as f64]
    }

    /// Bilinear sample at normalized coordinates in [0, 1]².
    pub fn get(&self, x: f64, y: f64) -> [f64; 3] {
        let x1 = ((x * (self.width - 1) as f64) as usize).min(self.width - 1);
        let x2 = (x1 + 1).min(self.width - 1);
        let y1 = ((y * (self.height - 1) as f64) as usize).min(self.height - 1);
        let y2 = (y1 + 1).min(self.height - 1);

        let xt = x * self.width as f64 - x1 as f64;
        let yt = y * self.height as f64 - y1 as f64;

        lerp3(
            lerp3(self.pixel(x1, y1), self.pixel(x1, y2), yt),
            lerp3(self.pixel(x2, y1), self.pixel(x2, y2), yt),
            xt,
        )
    }

    /// Sample mapped into [0, 1] per channel, for a quantized texture
    /// with the given distance range.
    pub fn normalized(&self, x: f64, y: f64, scale: f64) -> [f64; 3] {
        self.get(x, y)
            .map(|n| (n / (scale / 2.0) + 0.5).clamp(0.0, 1.0))
    }

    /// Binary inside/outside view per channel.
    pub fn test(&self, x: f64, y: f64) -> [f64; 3] {
        self.get(x, y).map(|n| if n < 0.0 { 0.0 } else { 1.0 })
    }

    /// The filled shape as rendered through the median: black outside,
    /// white inside.
    pub fn rendered(&self, x: f64, y: f64) -> [f64; 3] {
        let p = self.get(x, y);
        if median(p[0], p[1], p[2]) < 0.0 {
            [0.0, 0.0, 0.0]
        } else {
            [1.0, 1.0, 1.0]
        }
    }
}

fn lerp3(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Whether two consecutive curves meet at a sharp corner.
fn is_corner(a: &Curve, b: &Curve, cross_threshold: f64) -> bool {
    let ta = a.tangent(1.0).normalize();
    let tb = b.tangent(0.0).normalize();
    ta.dot(tb) <= 0.0 || ta.cross(tb).abs() > cross_threshold
}

fn corner_indices(ring: &Ring, angle_threshold: f64) -> Vec<usize> {
    let cross_threshold = angle_threshold.sin();
    let curves = ring.curves();
    let mut corners = Vec::new();

    let mut prev = &curves[curves.len() - 1];
    for (i, curr) in curves.iter().enumerate() {
        if is_corner(prev, curr, cross_threshold) {
            corners.push(i);
        }
        prev = curr;
    }
    corners
}

fn split_into_thirds(c: &Curve) -> Vec<Curve> {
    c.split_at(&[0.33, 0.66])
}

/// Assign channels to a ring's curves by corner analysis.
///
/// No corners: every curve carries all channels. One corner (a
/// "teardrop"): a magenta/white/yellow progression away from the
/// corner, splitting rings of fewer than three curves so every phase
/// has its own segment. Multiple corners: cycle through the two-channel
/// colors between successive corners, with the starting color chosen by
/// the corner count so the sequence closes without a repeat.
fn edge_colors(ring: &Ring, angle_threshold: f64) -> Vec<(Curve, Channels)> {
    let corners = corner_indices(ring, angle_threshold);
    let curves = ring.curves();
    let mut result = Vec::new();

    if corners.is_empty() {
        // smooth contour
        for c in curves {
            result.push((*c, Channels::WHITE));
        }
    } else if corners.len() == 1 {
        // teardrop
        let offset = corners[0];
        let colors = [Channels::MAGENTA, Channels::WHITE, Channels::YELLOW];
        let num = curves.len();

        if num >= 3 {
            for i in 0..num {
                let c = curves[(i + offset) % num];
                let color_idx =
                    (3.0 + (2.875 * i as f64) / (num as f64 - 1.0) - 1.4375 + 0.5) as usize - 2;
                result.push((c, colors[color_idx]));
            }
        } else if num == 2 {
            let a = split_into_thirds(&curves[0]);
            let b = split_into_thirds(&curves[1]);
            for i in 0..6 {
                let c = if i < 3 { a[i] } else { b[i - 3] };
                result.push((c, colors[i / 2]));
            }
        } else {
            let thirds = split_into_thirds(&curves[0]);
            for (i, c) in thirds.iter().enumerate() {
                result.push((*c, colors[i]));
            }
        }
    } else {
        // multi-corner
        let offset = corners[0];
        let mut c_idx = 0usize;
        let colors = [
            if corners.len() % 3 == 1 {
                Channels::YELLOW
            } else {
                Channels::CYAN
            },
            Channels::CYAN,
            Channels::MAGENTA,
            Channels::YELLOW,
        ];

        for i in 0..curves.len() {
            let idx = (i + offset) % curves.len();
            if c_idx + 1 < corners.len() && corners[c_idx + 1] == idx {
                c_idx += 1;
            }
            let color = colors[1 + (c_idx % 3) - usize::from(c_idx == 0)];
            result.push((curves[idx], color));
        }
    }

    result
}

/// Whether a pair of neighboring pixels is discontinuous in exactly two
/// of three channels, which produces artifacts under median sampling.
fn clash(a: [f32; 3], b: [f32; 3], threshold: f64) -> bool {
    // only pairs on the same side of the shape can clash
    let a_in = (a[0] > 0.0) as u8 + (a[1] > 0.0) as u8 + (a[2] > 0.0) as u8 >= 2;
    let b_in = (b[0] > 0.0) as u8 + (b[1] > 0.0) as u8 + (b[2] > 0.0) as u8 >= 2;
    if a_in != b_in {
        return false;
    }
    // a 0 <-> 1 or 2 <-> 3 channel change is fine, 1 <-> 1 or 2 <-> 2 is not
    if (a[0] > 0.0 && a[1] > 0.0 && a[2] > 0.0)
        || (a[0] < 0.0 && a[1] < 0.0 && a[2] < 0.0)
        || (b[0] > 0.0 && b[1] > 0.0 && b[2] > 0.0)
        || (b[0] < 0.0 && b[1] < 0.0 && b[2] < 0.0)
    {
        return false;
    }
    // identify the two changing channels and the remaining one
    let flips = |i: usize| (a[i] > 0.0) != (b[i] > 0.0) && (a[i] < 0.0) != (b[i] < 0.0);
    let (aa, ba, ab, bb, ac, bc);
    if flips(0) {
        aa = a[0];
        ba = b[0];
        if flips(1) {
            ab = a[1];
            bb = b[1];
            ac = a[2];
            bc = b[2];
        } else if flips(2) {
            ab = a[2];
            bb = b[2];
            ac = a[1];
            bc = b[1];
        } else {
            return false;
        }
    } else if flips(1) && flips(2) {
        aa = a[1];
        ba = b[1];
        ab = a[2];
        bb = b[2];
        ac = a[0];
        bc = b[0];
    } else {
        return false;
    }
    // require an actual discontinuity, and flag only the pixel farther
    // from the edge out of the pair
    (aa - ba).abs() as f64 >= threshold
        && (ab - bb).abs() as f64 >= threshold
        && ac.abs() >= bc.abs()
}

/// Collapse every clashing pixel to the median of its channels.
fn fix_clashes(data: &mut [[f32; 3]], width: usize, height: usize, threshold: (f64, f64)) {
    for x in 0..width {
        for y in 0..height {
            let color = data[y * width + x];
            if (x > 0 && clash(color, data[y * width + x - 1], threshold.0))
                || (x + 1 < width && clash(color, data[y * width + x + 1], threshold.0))
                || (y > 0 && clash(color, data[(y - 1) * width + x], threshold.1))
                || (y + 1 < height && clash(color, data[(y + 1) * width + x], threshold.1))
            {
                let m = median(color[0] as f64, color[1] as f64, color[2] as f64) as f32;
                data[y * width + x] = [m, m, m];
            }
        }
    }
}
