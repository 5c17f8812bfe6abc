use nalgebra::Vector3;
use tessera_types::Coordinate;

/// Plane with an orthonormal 2d basis, used to map 3d points into a 2d triangulation.
///
/// Basis vectors `b1`, `b2` and `normal` form a right-handed frame, so a ring that runs counter-clockwise when seen
/// from the side the normal points to is counter-clockwise in the plane coordinates too.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    origin: Vector3<f64>,
    b1: Vector3<f64>,
    b2: Vector3<f64>,
    normal: Vector3<f64>,
}

impl Plane {
    /// Plane through three points, with the origin at `p` and the first axis pointing from `p` to `q`.
    ///
    /// Returns `None` if the points are collinear.
    pub fn from_points(p: Vector3<f64>, q: Vector3<f64>, r: Vector3<f64>) -> Option<Self> {
        let normal = (q - p).cross(&(r - p)).try_normalize(0.0)?;
        let b1 = (q - p).try_normalize(0.0)?;
        let b2 = normal.cross(&b1);

        Some(Self {
            origin: p,
            b1,
            b2,
            normal,
        })
    }

    /// Plane `z = 0` with the standard `x` and `y` axes.
    pub fn xy() -> Self {
        Self {
            origin: Vector3::zeros(),
            b1: Vector3::x(),
            b2: Vector3::y(),
            normal: Vector3::z(),
        }
    }

    /// Origin of the plane coordinates.
    pub fn origin(&self) -> Vector3<f64> {
        self.origin
    }

    /// Unit normal.
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// The same plane seen from the other side: normal and second axis are negated.
    pub fn flipped(&self) -> Self {
        Self {
            origin: self.origin,
            b1: self.b1,
            b2: -self.b2,
            normal: -self.normal,
        }
    }

    /// Coordinates of the orthogonal projection of `point` onto the plane.
    pub fn to_2d(&self, point: &Vector3<f64>) -> [f64; 2] {
        let d = point - self.origin;
        [d.dot(&self.b1), d.dot(&self.b2)]
    }

    /// Projects a coordinate. 2d coordinates are treated as lying at `z = 0`.
    pub fn project(&self, coordinate: &Coordinate) -> [f64; 2] {
        self.to_2d(&to_vector(coordinate))
    }
}

/// Coordinate as a 3d vector, `z = 0` for 2d coordinates.
pub(crate) fn to_vector(coordinate: &Coordinate) -> Vector3<f64> {
    Vector3::new(
        coordinate.x(),
        coordinate.y(),
        coordinate.z_opt().unwrap_or(0.0),
    )
}
