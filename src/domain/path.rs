use geo::Coord;

/// Out-and-back flight between the launch point and one cell centroid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightPath {
    pub outbound: [Coord<f64>; 2],
    pub inbound: [Coord<f64>; 2],
}

impl FlightPath {
    pub fn new(start: Coord<f64>, target: Coord<f64>) -> Self {
        Self {
            outbound: [start, target],
            inbound: [target, start],
        }
    }

    pub fn target(&self) -> Coord<f64> {
        self.outbound[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn test_flight_path_legs() {
        let path = FlightPath::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 3.0, y: 4.0 });
        assert_eq!(path.outbound[0], path.inbound[1]);
        assert_eq!(path.outbound[1], path.inbound[0]);
        assert_eq!(path.target(), coord! { x: 3.0, y: 4.0 });
    }
}
