use formats::{Footprint, Position, Ring};

/// Even-odd containment over all rings, so points inside a hole are outside.
pub fn polygon_contains(rings: &[Ring], p: Position) -> bool {
    let mut inside = false;
    for ring in rings {
        if ring_crossings_odd(ring, p) {
            inside = !inside;
        }
    }
    inside
}

pub fn footprint_contains(footprint: &Footprint, p: Position) -> bool {
    footprint.polygons.iter().any(|rings| polygon_contains(rings, p))
}

fn ring_crossings_odd(ring: &[Position], p: Position) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut odd = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i][0], ring[i][1]);
        let (xj, yj) = (ring[j][0], ring[j][1]);
        if (yi > p[1]) != (yj > p[1]) {
            let x_cross = (xj - xi) * (p[1] - yi) / (yj - yi) + xi;
            if p[0] < x_cross {
                odd = !odd;
            }
        }
        j = i;
    }
    odd
}

#[cfg(test)]
mod tests {
    use super::{footprint_contains, polygon_contains};
    use formats::Footprint;

    fn courtyard() -> Vec<Vec<[f64; 2]>> {
        vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]],
            vec![[4.0, 4.0], [4.0, 6.0], [6.0, 6.0], [6.0, 4.0]],
        ]
    }

    #[test]
    fn inside_outer_ring() {
        assert!(polygon_contains(&courtyard(), [1.0, 1.0]));
    }

    #[test]
    fn hole_is_outside() {
        assert!(!polygon_contains(&courtyard(), [5.0, 5.0]));
    }

    #[test]
    fn outside_everything() {
        assert!(!polygon_contains(&courtyard(), [11.0, 5.0]));
        assert!(!polygon_contains(&courtyard(), [-0.5, -0.5]));
    }

    #[test]
    fn any_part_of_a_multipolygon_matches() {
        let fp = Footprint {
            polygons: vec![
                vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]],
                vec![vec![[5.0, 0.0], [6.0, 0.0], [6.0, 1.0], [5.0, 1.0]]],
            ],
        };
        assert!(footprint_contains(&fp, [5.5, 0.5]));
        assert!(!footprint_contains(&fp, [3.0, 0.5]));
    }
}
