//! Delaunay triangulation of planar points (Bowyer-Watson)
//!
//! Intended for the few hundred sites of an option chain: insertion is
//! O(n) per point and point location is a linear scan. Points are expected
//! to be distinct; [`super::scattered`] merges duplicates before
//! triangulating.

/// Triangulated point set
#[derive(Debug, Clone)]
pub struct Triangulation {
    points: Vec<[f64; 2]>,
    triangles: Vec<[usize; 3]>,
}

#[derive(Debug, Clone, Copy)]
struct Triangle {
    vertices: [usize; 3],
    center: [f64; 2],
    radius_sq: f64,
}

/// Twice the signed area of (a, b, c)
fn orientation(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

impl Triangle {
    /// `None` for (near) collinear vertices
    fn new(vertices: [usize; 3], points: &[[f64; 2]]) -> Option<Self> {
        let [a, b, c] = vertices.map(|i| points[i]);
        let d = 2.0 * orientation(a, b, c);
        let scale = (b[0] - a[0]).abs().max((c[0] - a[0]).abs()).max((b[1] - a[1]).abs()).max((c[1] - a[1]).abs());
        if d.abs() <= 1e-12 * scale * scale {
            return None;
        }

        let a_sq = a[0] * a[0] + a[1] * a[1];
        let b_sq = b[0] * b[0] + b[1] * b[1];
        let c_sq = c[0] * c[0] + c[1] * c[1];
        let cx = (a_sq * (b[1] - c[1]) + b_sq * (c[1] - a[1]) + c_sq * (a[1] - b[1])) / d;
        let cy = (a_sq * (c[0] - b[0]) + b_sq * (a[0] - c[0]) + c_sq * (b[0] - a[0])) / d;
        let radius_sq = (a[0] - cx).powi(2) + (a[1] - cy).powi(2);

        Some(Self {
            vertices,
            center: [cx, cy],
            radius_sq,
        })
    }

    fn circumcircle_contains(&self, p: [f64; 2]) -> bool {
        let d_sq = (p[0] - self.center[0]).powi(2) + (p[1] - self.center[1]).powi(2);
        d_sq < self.radius_sq
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }
}

fn same_edge(e: (usize, usize), f: (usize, usize)) -> bool {
    (e.0 == f.0 && e.1 == f.1) || (e.0 == f.1 && e.1 == f.0)
}

impl Triangulation {
    /// Triangulate `points`. Fewer than three points, or collinear points,
    /// give a triangulation without triangles.
    pub fn new(points: &[[f64; 2]]) -> Self {
        let n = points.len();
        let mut all: Vec<[f64; 2]> = points.to_vec();

        if n < 3 {
            return Self {
                points: all,
                triangles: Vec::new(),
            };
        }

        // Super triangle enclosing every point with a wide margin
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min_x = min_x.min(p[0]);
            min_y = min_y.min(p[1]);
            max_x = max_x.max(p[0]);
            max_y = max_y.max(p[1]);
        }
        let span = (max_x - min_x).max(max_y - min_y).max(1.0);
        let (mid_x, mid_y) = (0.5 * (min_x + max_x), 0.5 * (min_y + max_y));
        let radius = 1000.0 * span;
        all.push([mid_x, mid_y + 2.0 * radius]);
        all.push([mid_x - 3f64.sqrt() * radius, mid_y - radius]);
        all.push([mid_x + 3f64.sqrt() * radius, mid_y - radius]);

        let mut triangles: Vec<Triangle> = Triangle::new([n, n + 1, n + 2], &all)
            .into_iter()
            .collect();

        for i in 0..n {
            let p = all[i];

            let (bad, good): (Vec<Triangle>, Vec<Triangle>) = triangles
                .into_iter()
                .partition(|t| t.circumcircle_contains(p));
            triangles = good;

            // Cavity boundary: edges that belong to exactly one bad triangle
            let edges: Vec<(usize, usize)> = bad.iter().flat_map(|t| t.edges()).collect();
            for (k, &edge) in edges.iter().enumerate() {
                let shared = edges
                    .iter()
                    .enumerate()
                    .any(|(m, &other)| m != k && same_edge(edge, other));
                if !shared {
                    if let Some(t) = Triangle::new([edge.0, edge.1, i], &all) {
                        triangles.push(t);
                    }
                }
            }
        }

        let triangles = triangles
            .into_iter()
            .map(|t| t.vertices)
            .filter(|v| v.iter().all(|&idx| idx < n))
            .collect();

        all.truncate(n);
        Self {
            points: all,
            triangles,
        }
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangle containing `p` and the barycentric weights of its vertices
    pub fn locate(&self, p: [f64; 2]) -> Option<([usize; 3], [f64; 3])> {
        const EPS: f64 = 1e-10;

        self.triangles.iter().find_map(|&tri| {
            let [a, b, c] = tri.map(|i| self.points[i]);
            let det = orientation(a, b, c);
            if det == 0.0 {
                return None;
            }
            let wa = orientation(p, b, c) / det;
            let wb = orientation(a, p, c) / det;
            let wc = 1.0 - wa - wb;
            if wa >= -EPS && wb >= -EPS && wc >= -EPS {
                Some((tri, [wa, wb, wc]))
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(t: &Triangulation, tri: [usize; 3]) -> f64 {
        let [a, b, c] = tri.map(|i| t.points()[i]);
        0.5 * orientation(a, b, c).abs()
    }

    #[test]
    fn test_square_splits_into_two_triangles() {
        let t = Triangulation::new(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        assert_eq!(t.triangles().len(), 2);
        let total: f64 = t.triangles().iter().map(|&tri| area(&t, tri)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_covers_hull() {
        let mut points = Vec::new();
        for i in 0..5 {
            for j in 0..4 {
                points.push([i as f64 / 4.0, j as f64 / 3.0]);
            }
        }
        let t = Triangulation::new(&points);

        // A 5x4 lattice has 2 * 4 * 3 triangles
        assert_eq!(t.triangles().len(), 24);
        let total: f64 = t.triangles().iter().map(|&tri| area(&t, tri)).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs_have_no_triangles() {
        assert!(Triangulation::new(&[[0.0, 0.0]]).is_empty());
        assert!(Triangulation::new(&[[0.0, 0.0], [1.0, 1.0]]).is_empty());
        assert!(Triangulation::new(&[[0.0, 0.0], [0.5, 0.0], [1.0, 0.0], [0.25, 0.0]]).is_empty());
    }

    #[test]
    fn test_locate_barycentric() {
        let t = Triangulation::new(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        let (tri, w) = t.locate([0.25, 0.25]).unwrap();

        let [a, b, c] = tri.map(|i| t.points()[i]);
        let x = w[0] * a[0] + w[1] * b[0] + w[2] * c[0];
        let y = w[0] * a[1] + w[1] * b[1] + w[2] * c[1];
        assert!((x - 0.25).abs() < 1e-12 && (y - 0.25).abs() < 1e-12);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);

        assert!(t.locate([1.0, 1.0]).is_none());
        // Vertices and edges count as inside
        assert!(t.locate([0.0, 0.0]).is_some());
        assert!(t.locate([0.5, 0.5]).is_some());
    }
}
