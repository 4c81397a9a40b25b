//! Piecewise-linear vector field sampled on a triangular lattice.
//!
//! Lattice point (u, v) sits at `((u + v/2) / N, (√3/2) v / N)`, covering
//! the unit equilateral triangle with corners (0, 0), (1, 0) and
//! (1/2, √3/2). Each lattice cell is split into an upward and a downward
//! triangle and values are interpolated linearly inside each.

use std::io::Read;

use geo_common::{GeoError, GeoResult};

use crate::math::ROOT3;

/// Interpolated value and partial derivatives at a point.
///
/// `f` and `g` are the x and y components of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    pub x: f64,
    pub y: f64,
    pub dfdx: f64,
    pub dfdy: f64,
    pub dgdx: f64,
    pub dgdy: f64,
}

#[derive(Debug, Clone)]
pub struct TriangulatedVectorField {
    side: usize,
    /// `xs[u][v]`; row `u` holds `side + 1 - u` samples.
    xs: Vec<Vec<f64>>,
    ys: Vec<Vec<f64>>,
}

impl TriangulatedVectorField {
    /// Build a field by evaluating `sample(u, v)` at every lattice point.
    ///
    /// Points are visited row by row in increasing `v`, then `u`.
    pub fn from_fn<F>(side: usize, mut sample: F) -> GeoResult<Self>
    where
        F: FnMut(usize, usize) -> (f64, f64),
    {
        if side == 0 {
            return Err(GeoError::DataLoadFailure(
                "vector field side must be positive".to_string(),
            ));
        }
        let mut xs: Vec<Vec<f64>> = (0..=side).map(|u| Vec::with_capacity(side + 1 - u)).collect();
        let mut ys = xs.clone();
        for v in 0..=side {
            for u in 0..=side - v {
                let (x, y) = sample(u, v);
                xs[u].push(x);
                ys[u].push(y);
            }
        }
        Ok(Self { side, xs, ys })
    }

    /// Parse field text of the given side length.
    ///
    /// Each non-blank line is one row of `x y` number pairs, rows in
    /// increasing `v` with row `v` holding `u = 0..=side - v`. Brackets,
    /// commas and whitespace all separate numbers. Every value is multiplied
    /// by `scale`. The row count and every row length must match the lattice.
    pub fn parse(text: &str, side: usize, scale: f64) -> GeoResult<Self> {
        let mut rows: Vec<Vec<(f64, f64)>> = Vec::with_capacity(side + 1);
        for (line_no, line) in text.lines().enumerate() {
            let tokens: Vec<&str> = line
                .split(|c: char| c.is_whitespace() || matches!(c, '[' | ']' | ','))
                .filter(|t| !t.is_empty())
                .collect();
            if tokens.is_empty() {
                continue;
            }

            let v = rows.len();
            if v > side {
                return Err(GeoError::DataLoadFailure(format!(
                    "vector field of side {} has more than {} rows (line {})",
                    side,
                    side + 1,
                    line_no + 1
                )));
            }
            let expected = side + 1 - v;
            if tokens.len() != expected * 2 {
                return Err(GeoError::DataLoadFailure(format!(
                    "vector field row {} needs {} pairs, found {} values (line {})",
                    v,
                    expected,
                    tokens.len(),
                    line_no + 1
                )));
            }

            let mut row = Vec::with_capacity(expected);
            for pair in tokens.chunks_exact(2) {
                let x = parse_value(pair[0], line_no)?;
                let y = parse_value(pair[1], line_no)?;
                row.push((x * scale, y * scale));
            }
            rows.push(row);
        }

        if rows.len() != side + 1 {
            return Err(GeoError::DataLoadFailure(format!(
                "vector field of side {} needs {} rows, found {}",
                side,
                side + 1,
                rows.len()
            )));
        }

        Self::from_fn(side, |u, v| rows[v][u])
    }

    /// Read and parse field text from any reader.
    pub fn from_reader<R: Read>(mut reader: R, side: usize, scale: f64) -> GeoResult<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text, side, scale)
    }

    /// Number of lattice cells along each edge.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Sample at lattice point (u, v), if it exists.
    pub fn get(&self, u: usize, v: usize) -> Option<(f64, f64)> {
        Some((*self.xs.get(u)?.get(v)?, self.ys[u][v]))
    }

    /// Interpolate the field at (x, y) in unit-triangle coordinates.
    ///
    /// Points outside the triangle are extrapolated from the nearest edge
    /// cell.
    pub fn interpolate(&self, x: f64, y: f64) -> FieldSample {
        let n = self.side as f64;
        let last = self.side as i64 - 1;

        let x = x * n;
        let y = y * n;

        let v = 2.0 * y / ROOT3;
        let u = x - 0.5 * v;

        let u1 = (u as i64).clamp(0, last);
        let v1 = (v as i64).clamp(0, last - u1);
        let (u1, v1) = (u1 as usize, v1 as usize);
        let (uf, vf) = (u1 as f64, v1 as f64);

        let upward = y < -ROOT3 * (x - uf - vf - 1.0) || v1 == self.side - u1 - 1;

        let (corners, x3, y3, y, flip) = if upward {
            (
                [(u1, v1), (u1, v1 + 1), (u1 + 1, v1)],
                (u1 + 1) as f64 + 0.5 * vf,
                0.5 * ROOT3 * vf,
                y,
                1.0,
            )
        } else {
            (
                [(u1, v1 + 1), (u1 + 1, v1), (u1 + 1, v1 + 1)],
                (u1 + 1) as f64 + 0.5 * (vf + 1.0),
                -(0.5 * ROOT3 * (vf + 1.0)),
                -y,
                -1.0,
            )
        };

        let [(ua, va), (ub, vb), (uc, vc)] = corners;
        let (fx1, fy1) = (self.xs[ua][va], self.ys[ua][va]);
        let (fx2, fy2) = (self.xs[ub][vb], self.ys[ub][vb]);
        let (fx3, fy3) = (self.xs[uc][vc], self.ys[uc][vc]);

        let w1 = -(y - y3) / ROOT3 - (x - x3);
        let w2 = 2.0 * (y - y3) / ROOT3;
        let w3 = 1.0 - w1 - w2;

        FieldSample {
            x: fx1 * w1 + fx2 * w2 + fx3 * w3,
            y: fy1 * w1 + fy2 * w2 + fy3 * w3,
            dfdx: (fx3 - fx1) * n,
            dfdy: n * flip * (2.0 * fx2 - fx1 - fx3) / ROOT3,
            dgdx: (fy3 - fy1) * n,
            dgdy: n * flip * (2.0 * fy2 - fy1 - fy3) / ROOT3,
        }
    }

    /// Find the point whose interpolated value is `(expected_x, expected_y)`
    /// with `iterations` Newton steps from `(x, y)`.
    ///
    /// There is no convergence check; use [`Self::residual`] to measure how
    /// close the result is.
    pub fn newton_invert(
        &self,
        expected_x: f64,
        expected_y: f64,
        mut x: f64,
        mut y: f64,
        iterations: usize,
    ) -> (f64, f64) {
        for _ in 0..iterations {
            let s = self.interpolate(x, y);
            let f = s.x - expected_x;
            let g = s.y - expected_y;

            let det = 1.0 / (s.dfdx * s.dgdy - s.dfdy * s.dgdx);

            x -= det * (s.dgdy * f - s.dfdy * g);
            y -= det * (-s.dgdx * f + s.dfdx * g);
        }
        (x, y)
    }

    /// Distance between the field value at (x, y) and the expected value.
    pub fn residual(&self, expected_x: f64, expected_y: f64, x: f64, y: f64) -> f64 {
        let s = self.interpolate(x, y);
        (s.x - expected_x).hypot(s.y - expected_y)
    }
}

/// Number of lattice points for a triangle of the given side.
pub fn lattice_len(side: usize) -> usize {
    (side + 1) * (side + 2) / 2
}

fn parse_value(token: &str, line_no: usize) -> GeoResult<f64> {
    let value: f64 = token.parse().map_err(|_| {
        GeoError::DataLoadFailure(format!(
            "vector field value on line {} is not a number: {:?}",
            line_no + 1,
            token
        ))
    })?;
    if !value.is_finite() {
        return Err(GeoError::DataLoadFailure(format!(
            "vector field value on line {} is not finite",
            line_no + 1
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A field whose value is the lattice position itself.
    fn position_field(side: usize) -> TriangulatedVectorField {
        let n = side as f64;
        TriangulatedVectorField::from_fn(side, |u, v| {
            ((u as f64 + 0.5 * v as f64) / n, 0.5 * ROOT3 * v as f64 / n)
        })
        .unwrap()
    }

    #[test]
    fn test_lattice_shape() {
        let field = position_field(4);
        assert_eq!(field.side(), 4);
        for u in 0..=4 {
            assert_eq!(field.xs[u].len(), 5 - u);
        }
        assert!(field.get(4, 0).is_some());
        assert!(field.get(4, 1).is_none());
        assert_eq!(lattice_len(256), 33153);
    }

    #[test]
    fn test_linear_field_is_reproduced() {
        let field = position_field(8);
        for &(x, y) in &[(0.5, 0.2), (0.1, 0.05), (0.9, 0.01), (0.5, 0.8), (0.37, 0.41)] {
            let s = field.interpolate(x, y);
            assert!((s.x - x).abs() < 1e-12, "x at ({}, {})", x, y);
            assert!((s.y - y).abs() < 1e-12, "y at ({}, {})", x, y);
            assert!((s.dfdx - 1.0).abs() < 1e-9);
            assert!(s.dfdy.abs() < 1e-9);
            assert!(s.dgdx.abs() < 1e-9);
            assert!((s.dgdy - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_lattice_points_are_exact() {
        let field = TriangulatedVectorField::from_fn(4, |u, v| (u as f64 * 10.0, v as f64)).unwrap();
        let s = field.interpolate(0.25 + 0.125, 0.5 * ROOT3 * 0.25);
        // Lattice point (1, 1)
        assert!((s.x - 10.0).abs() < 1e-9);
        assert!((s.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_newton_inverts_affine_field() {
        let field = TriangulatedVectorField::from_fn(8, |u, v| {
            let (x, y) = ((u as f64 + 0.5 * v as f64) / 8.0, 0.5 * ROOT3 * v as f64 / 8.0);
            (2.0 * x + 0.3 * y + 1.0, -0.5 * x + 1.5 * y)
        })
        .unwrap();
        let target = field.interpolate(0.4, 0.3);
        let (x, y) = field.newton_invert(target.x, target.y, 0.5, 0.25, 5);
        assert!((x - 0.4).abs() < 1e-12);
        assert!((y - 0.3).abs() < 1e-12);
        assert!(field.residual(target.x, target.y, x, y) < 1e-12);
    }

    #[test]
    fn test_parse_tolerates_brackets() {
        let text = "[[0, 0], [1, 0], [2, 0]],\n[[0, 1], [1, 1]],\n[[0, 2]]\n";
        let field = TriangulatedVectorField::parse(text, 2, 0.5).unwrap();
        assert_eq!(field.get(0, 0), Some((0.0, 0.0)));
        assert_eq!(field.get(2, 0), Some((1.0, 0.0)));
        assert_eq!(field.get(1, 1), Some((0.5, 0.5)));
        assert_eq!(field.get(0, 2), Some((0.0, 1.0)));
    }

    #[test]
    fn test_parse_rejects_wrong_count() {
        let text = "0 0 1 0 2 0\n0 1 1 1\n";
        assert!(matches!(
            TriangulatedVectorField::parse(text, 2, 1.0),
            Err(GeoError::DataLoadFailure(_))
        ));
        let text = "0 0 1 0 2 0\n0 1 1 1\n0 2\n7 7\n";
        assert!(TriangulatedVectorField::parse(text, 2, 1.0).is_err());
    }

    #[test]
    fn test_parse_rejects_misaligned_rows() {
        // Right total pair count, wrong split between rows.
        let text = "0 0 1 0\n2 0 0 1 1 1\n0 2";
        let err = TriangulatedVectorField::parse(text, 2, 1.0).unwrap_err();
        match err {
            GeoError::DataLoadFailure(msg) => assert!(msg.contains("row 0"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }

        let text = "0 0 1 0 2 0 0 1\n1 1\n0 2";
        assert!(matches!(
            TriangulatedVectorField::parse(text, 2, 1.0),
            Err(GeoError::DataLoadFailure(_))
        ));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = "\n0 0 1 0\n\n  \n0 1\n\n";
        let field = TriangulatedVectorField::parse(text, 1, 1.0).unwrap();
        assert_eq!(field.get(1, 0), Some((1.0, 0.0)));
        assert_eq!(field.get(0, 1), Some((0.0, 1.0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let text = "0 0 1 0 2 0\n0 1 1 one\n0 2";
        assert!(matches!(
            TriangulatedVectorField::parse(text, 2, 1.0),
            Err(GeoError::DataLoadFailure(_))
        ));
        let text = "0 0 1 0 2 0\n0 1 1 inf\n0 2";
        assert!(TriangulatedVectorField::parse(text, 2, 1.0).is_err());
        assert!(TriangulatedVectorField::parse("", 2, 1.0).is_err());
    }

    #[test]
    fn test_zero_side_rejected() {
        assert!(TriangulatedVectorField::from_fn(0, |_, _| (0.0, 0.0)).is_err());
    }
}
