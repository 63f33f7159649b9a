//! Delaunay triangulation of scattered positions.
//!
//! Points are inserted incrementally (Bowyer-Watson), after shifting and
//! scaling the positions into a unit box so the geometric predicates
//! behave the same for degree-sized and metre-sized inputs. The hull is
//! closed by ghost triangles sharing one symbolic vertex, so no finite
//! enclosing triangle can swallow thin triangles along the hull. Queries go through an R-tree over triangle
//! envelopes and weight the three corner values barycentrically.

use std::collections::{HashMap, HashSet};

use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

use crate::error::{GridError, Result};

/// Tolerance for accepting a query point on a triangle edge.
const BARYCENTRIC_EPS: f64 = 1e-10;

/// Minimum spread away from the best-fit line, in normalised coordinates.
const COLLINEAR_EPS: f64 = 1e-10;

type Point = [f64; 2];

/// Twice the signed area of `abc`; positive when counter-clockwise.
fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Positive when `d` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `abc`.
fn incircle(a: Point, b: Point, c: Point, d: Point) -> f64 {
    let (adx, ady) = (a[0] - d[0], a[1] - d[1]);
    let (bdx, bdy) = (b[0] - d[0], b[1] - d[1]);
    let (cdx, cdy) = (c[0] - d[0], c[1] - d[1]);

    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    alift * (bdx * cdy - bdy * cdx) + blift * (cdx * ady - cdy * adx) + clift * (adx * bdy - ady * bdx)
}

/// Maps input coordinates into a box of side 1 centred on the origin.
#[derive(Debug, Clone, Copy)]
struct Normalizer {
    cx: f64,
    cy: f64,
    scale: f64,
}

impl Normalizer {
    fn fit(positions: &[(f64, f64)]) -> Self {
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(x, y) in positions {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let scale = (max_x - min_x).max(max_y - min_y);
        Self {
            cx: (min_x + max_x) / 2.0,
            cy: (min_y + max_y) / 2.0,
            scale: if scale > 0.0 { scale } else { 1.0 },
        }
    }

    fn apply(&self, x: f64, y: f64) -> Point {
        [(x - self.cx) / self.scale, (y - self.cy) / self.scale]
    }
}

/// Reject position sets that cannot be triangulated.
///
/// `positions` must already be free of duplicates. Fewer than three
/// positions, or positions that all lie on one line, are reported as
/// [`GridError::DegenerateGeometry`].
pub fn check_non_degenerate(positions: &[(f64, f64)]) -> Result<()> {
    let n = positions.len();
    if n < 3 {
        return Err(GridError::degenerate(
            n,
            "at least 3 distinct positions are needed to triangulate",
        ));
    }

    let norm = Normalizer::fit(positions);
    let points: Vec<Point> = positions.iter().map(|&(x, y)| norm.apply(x, y)).collect();

    let origin = points[0];
    let far = points
        .iter()
        .copied()
        .max_by(|a, b| dist2(origin, *a).total_cmp(&dist2(origin, *b)))
        .unwrap_or(origin);
    let baseline = dist2(origin, far).sqrt();
    if baseline == 0.0 {
        return Err(GridError::degenerate(n, "all positions coincide"));
    }

    let spread = points
        .iter()
        .map(|&p| (orient(origin, far, p) / baseline).abs())
        .fold(0.0_f64, f64::max);
    if spread <= COLLINEAR_EPS {
        return Err(GridError::degenerate(n, "all positions are collinear"));
    }

    Ok(())
}

fn dist2(a: Point, b: Point) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

/// Stand-in vertex closing the hull. A triangle `(u, v, GHOST)` sits
/// outside the hull edge `u -> v`.
const GHOST: usize = usize::MAX;

/// Working triangle: vertices in counter-clockwise order, with `n[k]` the
/// neighbour across the edge opposite `v[k]`.
#[derive(Debug, Clone, Copy)]
struct Triangle {
    v: [usize; 3],
    n: [usize; 3],
    alive: bool,
}

impl Triangle {
    fn ghost_slot(&self) -> Option<usize> {
        self.v.iter().position(|&v| v == GHOST)
    }
}

/// Incremental Bowyer-Watson state.
///
/// Every triangle has three neighbours: hull edges border ghost
/// triangles, and ghost triangles border each other around the hull.
struct Builder<'a> {
    points: &'a [Point],
    triangles: Vec<Triangle>,
    last: usize,
}

impl<'a> Builder<'a> {
    /// Start from the counter-clockwise triangle `abc` and its three
    /// ghosts.
    fn new(points: &'a [Point], [a, b, c]: [usize; 3]) -> Self {
        let tri = |v, n| Triangle { v, n, alive: true };
        Self {
            points,
            triangles: vec![
                tri([a, b, c], [1, 2, 3]),
                tri([c, b, GHOST], [3, 2, 0]),
                tri([a, c, GHOST], [1, 3, 0]),
                tri([b, a, GHOST], [2, 1, 0]),
            ],
            last: 0,
        }
    }

    fn corner(&self, t: usize, k: usize) -> Point {
        self.points[self.triangles[t].v[k]]
    }

    /// Whether `p` is strictly inside the circumcircle of `t`.
    ///
    /// For a ghost triangle the circumcircle is the open half-plane
    /// beyond its hull edge, plus the open edge itself.
    fn in_circumcircle(&self, t: usize, p: Point) -> bool {
        let tri = &self.triangles[t];
        match tri.ghost_slot() {
            Some(k) => {
                let u = self.points[tri.v[(k + 1) % 3]];
                let w = self.points[tri.v[(k + 2) % 3]];
                let o = orient(u, w, p);
                o > 0.0 || (o == 0.0 && strictly_between(u, w, p))
            }
            None => incircle(self.corner(t, 0), self.corner(t, 1), self.corner(t, 2), p) > 0.0,
        }
    }

    /// Real triangle containing `p`, or the ghost beyond the hull edge
    /// `p` lies outside of. Walks from the last insertion.
    fn locate(&self, p: Point) -> Option<usize> {
        let mut t = self.last;
        if let Some(k) = self.triangles[t].ghost_slot() {
            t = self.triangles[t].n[k];
        }

        for step in 0..self.triangles.len() {
            let tri = &self.triangles[t];
            let mut next = None;
            for j in 0..3 {
                // Rotate the starting edge so the walk cannot cycle.
                let k = (j + step) % 3;
                let a = self.points[tri.v[(k + 1) % 3]];
                let b = self.points[tri.v[(k + 2) % 3]];
                if orient(a, b, p) < 0.0 {
                    next = Some(tri.n[k]);
                    break;
                }
            }
            match next {
                Some(nb) if self.triangles[nb].ghost_slot().is_some() => return Some(nb),
                Some(nb) => t = nb,
                None => return Some(t),
            }
        }
        self.locate_linear(p)
    }

    fn locate_linear(&self, p: Point) -> Option<usize> {
        let alive = || (0..self.triangles.len()).filter(move |&t| self.triangles[t].alive);
        alive()
            .find(|&t| {
                self.triangles[t].ghost_slot().is_none()
                    && (0..3).all(|k| {
                        let a = self.corner(t, (k + 1) % 3);
                        let b = self.corner(t, (k + 2) % 3);
                        orient(a, b, p) >= 0.0
                    })
            })
            .or_else(|| {
                alive().find(|&t| {
                    self.triangles[t].ghost_slot().is_some() && self.in_circumcircle(t, p)
                })
            })
    }

    fn insert(&mut self, idx: usize) -> Result<()> {
        let p = self.points[idx];
        let start = self.locate(p).ok_or_else(|| {
            GridError::degenerate(
                self.points.len(),
                format!("position {} could not be located in the triangulation", idx),
            )
        })?;
        if self.triangles[start]
            .v
            .iter()
            .any(|&v| v != GHOST && self.points[v] == p)
        {
            return Err(GridError::degenerate(
                self.points.len(),
                format!("position {} repeats an earlier position", idx),
            ));
        }

        // Cavity: every triangle whose circumcircle contains p, grown from
        // the located triangle through shared edges.
        let mut cavity = vec![start];
        let mut in_cavity: HashSet<usize> = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(t) = stack.pop() {
            for nb in self.triangles[t].n {
                if !in_cavity.contains(&nb) && self.in_circumcircle(nb, p) {
                    in_cavity.insert(nb);
                    cavity.push(nb);
                    stack.push(nb);
                }
            }
        }

        // Fan the cavity boundary around p.
        let mut created = Vec::new();
        for &t in &cavity {
            let tri = self.triangles[t];
            for k in 0..3 {
                let outer = tri.n[k];
                if in_cavity.contains(&outer) {
                    continue;
                }

                let a = tri.v[(k + 1) % 3];
                let b = tri.v[(k + 2) % 3];
                let new_t = self.triangles.len();
                self.triangles.push(Triangle {
                    v: [a, b, idx],
                    n: [usize::MAX, usize::MAX, outer],
                    alive: true,
                });

                if let Some(slot) = self.triangles[outer].n.iter().position(|&x| x == t) {
                    self.triangles[outer].n[slot] = new_t;
                }
                created.push(new_t);
            }
        }

        for &t in &cavity {
            self.triangles[t].alive = false;
        }

        // New triangle (a, b, p) meets (b, c, p) across edge b-p.
        let by_start: HashMap<usize, usize> = created
            .iter()
            .map(|&t| (self.triangles[t].v[0], t))
            .collect();
        for &t in &created {
            let b = self.triangles[t].v[1];
            if let Some(&next) = by_start.get(&b) {
                self.triangles[t].n[0] = next;
                self.triangles[next].n[1] = t;
            }
        }

        if let Some(&t) = created.last() {
            self.last = t;
        }
        Ok(())
    }

    /// Live triangles that use only real vertices.
    fn finish(self) -> Vec<[usize; 3]> {
        self.triangles
            .into_iter()
            .filter(|t| t.alive && t.ghost_slot().is_none())
            .map(|t| t.v)
            .collect()
    }
}

/// Whether `p`, already on the line through `u` and `w`, lies strictly
/// between them.
fn strictly_between(u: Point, w: Point, p: Point) -> bool {
    let d = [w[0] - u[0], w[1] - u[1]];
    let along = (p[0] - u[0]) * d[0] + (p[1] - u[1]) * d[1];
    along > 0.0 && along < d[0] * d[0] + d[1] * d[1]
}

/// Three positions spanning a counter-clockwise triangle of maximal area
/// with the first two in `order`.
fn seed_triangle(points: &[Point], order: &[usize]) -> Option<[usize; 3]> {
    let (&a, &b) = (order.first()?, order.get(1)?);
    let &c = order[2..].iter().max_by(|&&i, &&j| {
        orient(points[a], points[b], points[i])
            .abs()
            .total_cmp(&orient(points[a], points[b], points[j]).abs())
    })?;
    let area = orient(points[a], points[b], points[c]);
    if area > 0.0 {
        Some([a, b, c])
    } else if area < 0.0 {
        Some([b, a, c])
    } else {
        None
    }
}

/// Insertion order that keeps consecutive points close together, so the
/// locate walk stays short.
fn insertion_order(points: &[Point]) -> Vec<usize> {
    let columns = ((points.len() as f64).sqrt() / 2.0).ceil().max(1.0) as usize;
    let column_of = |p: Point| (((p[0] + 0.5) * columns as f64) as usize).min(columns - 1);

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&i, &j| {
        let (ci, cj) = (column_of(points[i]), column_of(points[j]));
        ci.cmp(&cj).then_with(|| {
            let (yi, yj) = (points[i][1], points[j][1]);
            if ci % 2 == 0 {
                yi.total_cmp(&yj)
            } else {
                yj.total_cmp(&yi)
            }
        })
    });
    order
}

/// Envelope of one triangle for R-tree storage.
#[derive(Debug, Clone, Copy)]
struct TriangleEnvelope {
    index: usize,
    min: Point,
    max: Point,
}

impl RTreeObject for TriangleEnvelope {
    type Envelope = AABB<Point>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

/// A Delaunay triangulation carrying one value per vertex.
#[derive(Debug)]
pub struct Triangulation {
    vertices: Vec<Point>,
    values: Vec<f64>,
    triangles: Vec<[usize; 3]>,
    index: RTree<TriangleEnvelope>,
    normalizer: Normalizer,
}

impl Triangulation {
    /// Triangulate distinct `(lon, lat)` positions carrying `values`.
    pub fn new(positions: &[(f64, f64)], values: &[f64]) -> Result<Self> {
        if positions.len() != values.len() {
            return Err(GridError::degenerate(
                positions.len(),
                format!(
                    "{} positions but {} values",
                    positions.len(),
                    values.len()
                ),
            ));
        }
        check_non_degenerate(positions)?;

        let normalizer = Normalizer::fit(positions);
        let vertices: Vec<Point> = positions
            .iter()
            .map(|&(x, y)| normalizer.apply(x, y))
            .collect();

        let order = insertion_order(&vertices);
        let seed = seed_triangle(&vertices, &order).ok_or_else(|| {
            GridError::degenerate(positions.len(), "no three positions span a triangle")
        })?;
        let mut builder = Builder::new(&vertices, seed);
        for idx in order.into_iter().filter(|idx| !seed.contains(idx)) {
            builder.insert(idx)?;
        }
        let triangles = builder.finish();

        let envelopes = triangles
            .iter()
            .enumerate()
            .map(|(index, tri)| {
                let [a, b, c] = tri.map(|v| vertices[v]);
                TriangleEnvelope {
                    index,
                    min: [a[0].min(b[0]).min(c[0]), a[1].min(b[1]).min(c[1])],
                    max: [a[0].max(b[0]).max(c[0]), a[1].max(b[1]).max(c[1])],
                }
            })
            .collect();

        debug!(
            vertices = vertices.len(),
            triangles = triangles.len(),
            "Built Delaunay triangulation"
        );

        Ok(Self {
            vertices,
            values: values.to_vec(),
            triangles,
            index: RTree::bulk_load(envelopes),
            normalizer,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Linearly interpolated value at `(lon, lat)`.
    ///
    /// Returns `None` outside the convex hull of the input positions.
    pub fn interpolate(&self, lon: f64, lat: f64) -> Option<f64> {
        let q = self.normalizer.apply(lon, lat);
        self.index
            .locate_in_envelope_intersecting(&AABB::from_point(q))
            .find_map(|env| {
                let [i, j, k] = self.triangles[env.index];
                let (wa, wb, wc) =
                    barycentric(self.vertices[i], self.vertices[j], self.vertices[k], q)?;
                Some(wa * self.values[i] + wb * self.values[j] + wc * self.values[k])
            })
    }
}

/// Barycentric weights of `q` in triangle `abc`, if `q` is inside it.
fn barycentric(a: Point, b: Point, c: Point, q: Point) -> Option<(f64, f64, f64)> {
    let area = orient(a, b, c);
    if area == 0.0 {
        return None;
    }
    let wa = orient(b, c, q) / area;
    let wb = orient(c, a, q) / area;
    let wc = 1.0 - wa - wb;
    if wa >= -BARYCENTRIC_EPS && wb >= -BARYCENTRIC_EPS && wc >= -BARYCENTRIC_EPS {
        Some((wa, wb, wc))
    } else {
        None
    }
}
