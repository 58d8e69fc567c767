//! Collision detection and response on the axis
//!
//! Response formulas are pure functions of pre-collision state, so both sides
//! of a pair can be computed before either is written back.

use super::state::PhysicalObject;

/// The nearest upcoming contact between two tracked objects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Index of the first participant
    pub first: usize,
    /// Index of the second participant
    pub second: usize,
    /// Time from the start of the detection pass until contact
    pub time: f64,
}

/// Post-collision velocity of body 1 in a 1D elastic collision
///
/// `v1' = (m1*v1 - m2*v1 + 2*m2*v2) / (m1 + m2)`
#[inline]
pub fn elastic_velocity(mass1: f64, velocity1: f64, mass2: f64, velocity2: f64) -> f64 {
    (mass1 * velocity1 - mass2 * velocity1 + 2.0 * mass2 * velocity2) / (mass1 + mass2)
}

/// Reflection off an immovable wall
#[inline]
pub fn wall_velocity(velocity: f64) -> f64 {
    -velocity
}

/// Sign of `value`, with magnitudes up to `epsilon` counted as zero
#[inline]
fn direction(value: f64, epsilon: f64) -> i8 {
    if value.abs() > epsilon {
        if value > 0.0 { 1 } else { -1 }
    } else {
        0
    }
}

/// Whether two objects approach each other
///
/// Compares the direction from `a` to `b` with the direction of their relative
/// velocity. Both being zero counts as approaching.
pub fn moving_towards(a: &PhysicalObject, b: &PhysicalObject, epsilon: f64) -> bool {
    let distance = b.position() - a.position();
    let relative_velocity = a.velocity() - b.velocity();
    direction(distance, epsilon) == direction(relative_velocity, epsilon)
}

/// Time until `a` and `b` touch at their current closing speed
///
/// Returns `None` when the closing speed is exactly zero.
pub fn time_to_collision(a: &PhysicalObject, b: &PhysicalObject) -> Option<f64> {
    let closing_speed = (a.velocity() - b.velocity()).abs();
    if closing_speed == 0.0 {
        return None;
    }
    Some(a.distance(b, None) / closing_speed)
}

/// Find the earliest collision strictly before `budget`
///
/// Every ordered pair is checked. On equal times the first pair in iteration
/// order wins. Pairs that already overlap report a contact time of zero.
pub fn nearest_collision(objects: &[PhysicalObject], budget: f64, epsilon: f64) -> Option<Collision> {
    let mut nearest: Option<Collision> = None;

    for (first, a) in objects.iter().enumerate() {
        for (second, b) in objects.iter().enumerate() {
            if first == second || !moving_towards(a, b, epsilon) {
                continue;
            }
            let Some(time) = time_to_collision(a, b) else {
                continue;
            };
            let time = time.max(0.0);
            if time < budget && nearest.is_none_or(|n| time < n.time) {
                nearest = Some(Collision {
                    first,
                    second,
                    time,
                });
            }
        }
    }

    if let Some(c) = &nearest {
        log::trace!("nearest collision: {} <-> {} in {:.6e}s", c.first, c.second, c.time);
    }
    nearest
}

/// True when no pair of objects is approaching
pub fn is_settled(objects: &[PhysicalObject], epsilon: f64) -> bool {
    nearest_collision(objects, f64::INFINITY, epsilon).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Block, Wall};
    use proptest::prelude::*;

    const EPS: f64 = 1e-15;

    fn block(size: f64, mass: f64, velocity: f64, position: f64) -> PhysicalObject {
        Block::new(size, mass, velocity, position).unwrap().into()
    }

    fn wall(position: f64) -> PhysicalObject {
        Wall::new(position).unwrap().into()
    }

    #[test]
    fn test_elastic_velocity_equal_masses_swap() {
        assert_eq!(elastic_velocity(1.0, 3.0, 1.0, -1.0), -1.0);
        assert_eq!(elastic_velocity(1.0, -1.0, 1.0, 3.0), 3.0);
    }

    #[test]
    fn test_wall_reflection() {
        assert_eq!(wall_velocity(-2.0), 2.0);
        assert_eq!(wall_velocity(0.0), 0.0);
    }

    #[test]
    fn test_moving_towards() {
        let a = block(1.0, 1.0, 0.0, 2.0);
        let b = block(1.5, 1.0, -2.0, 6.0);
        assert!(moving_towards(&a, &b, EPS));
        assert!(moving_towards(&b, &a, EPS));

        // Receding
        let c = block(1.5, 1.0, 2.0, 6.0);
        assert!(!moving_towards(&a, &c, EPS));

        // Resting block next to a wall: distance nonzero, closing speed zero
        let w = wall(0.0);
        assert!(!moving_towards(&a, &w, EPS));

        // Coincident and at rest counts as approaching
        let d = block(1.0, 1.0, 0.0, 2.0);
        assert!(moving_towards(&a, &d, EPS));
    }

    #[test]
    fn test_epsilon_counts_as_zero() {
        let a = block(1.0, 1.0, 1e-16, 2.0);
        let b = block(1.0, 1.0, 0.0, 2.0 + 1e-16);
        assert!(moving_towards(&a, &b, EPS));
    }

    #[test]
    fn test_time_to_collision() {
        let a = block(1.0, 1.0, 0.0, 2.0);
        let b = block(1.5, 1.0, -2.0, 6.0);
        assert_eq!(time_to_collision(&a, &b), Some(1.5));

        let still = block(1.0, 1.0, 0.0, 10.0);
        assert_eq!(time_to_collision(&a, &still), None);
    }

    #[test]
    fn test_nearest_collision_respects_budget() {
        let objects = vec![
            block(1.0, 1.0, 0.0, 2.0),
            block(1.5, 1.0, -2.0, 6.0),
            wall(0.0),
        ];
        assert_eq!(nearest_collision(&objects, 1.0, EPS), None);
        // Exactly at the budget is not inside the window
        assert_eq!(nearest_collision(&objects, 1.5, EPS), None);

        let c = nearest_collision(&objects, 2.0, EPS).unwrap();
        assert_eq!((c.first, c.second), (0, 1));
        assert_eq!(c.time, 1.5);
    }

    #[test]
    fn test_overlapping_pair_collides_now() {
        let objects = vec![block(1.0, 1.0, 1.0, 0.0), block(1.0, 1.0, 0.0, 0.5)];
        assert_eq!(time_to_collision(&objects[0], &objects[1]), Some(-0.5));

        let c = nearest_collision(&objects, 1.0, EPS).unwrap();
        assert_eq!((c.first, c.second), (0, 1));
        assert_eq!(c.time, 0.0);
        // Nothing fits in an empty window
        assert_eq!(nearest_collision(&objects, 0.0, EPS), None);
    }

    #[test]
    fn test_nearest_collision_picks_earliest() {
        let objects = vec![
            wall(0.0),
            block(1.0, 1.0, -1.0, 1.0),
            block(1.0, 1.0, -4.0, 4.0),
        ];
        // Block 1 reaches the wall at t=1, block 2 reaches block 1 at t=2/3
        let c = nearest_collision(&objects, 10.0, EPS).unwrap();
        assert_eq!((c.first, c.second), (1, 2));
        assert!((c.time - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_tie_keeps_first_pair() {
        // Two blocks hit two walls at the same instant
        let objects = vec![
            wall(0.0),
            block(1.0, 1.0, -1.0, 1.0),
            block(1.0, 1.0, 1.0, 8.0),
            wall(10.0),
        ];
        let c = nearest_collision(&objects, 10.0, EPS).unwrap();
        assert_eq!((c.first, c.second), (0, 1));
        assert_eq!(c.time, 1.0);
    }

    #[test]
    fn test_is_settled() {
        let objects = vec![
            wall(0.0),
            block(1.0, 1.0, 0.5, 1.0),
            block(1.0, 100.0, 2.0, 4.0),
        ];
        assert!(is_settled(&objects, EPS));

        let objects = vec![wall(0.0), block(1.0, 1.0, -0.5, 1.0)];
        assert!(!is_settled(&objects, EPS));
    }

    proptest! {
        #[test]
        fn prop_momentum_and_energy_conserved(
            m1 in 0.01f64..1.0e4,
            m2 in 0.01f64..1.0e4,
            v1 in -100.0f64..100.0,
            v2 in -100.0f64..100.0,
        ) {
            let u1 = elastic_velocity(m1, v1, m2, v2);
            let u2 = elastic_velocity(m2, v2, m1, v1);

            let p_before = m1 * v1 + m2 * v2;
            let p_after = m1 * u1 + m2 * u2;
            let p_scale = m1 * v1.abs() + m2 * v2.abs() + 1.0;
            prop_assert!((p_before - p_after).abs() <= 1e-9 * p_scale);

            let e_before = 0.5 * m1 * v1 * v1 + 0.5 * m2 * v2 * v2;
            let e_after = 0.5 * m1 * u1 * u1 + 0.5 * m2 * u2 * u2;
            prop_assert!((e_before - e_after).abs() <= 1e-9 * (e_before + 1.0));
        }

        #[test]
        fn prop_moving_towards_is_symmetric(
            p1 in -50.0f64..50.0,
            p2 in -50.0f64..50.0,
            v1 in -10.0f64..10.0,
            v2 in -10.0f64..10.0,
        ) {
            let a = block(1.0, 1.0, v1, p1);
            let b = block(2.0, 3.0, v2, p2);
            prop_assert_eq!(moving_towards(&a, &b, EPS), moving_towards(&b, &a, EPS));

            let w = wall(p2);
            prop_assert_eq!(moving_towards(&a, &w, EPS), moving_towards(&w, &a, EPS));
        }

        #[test]
        fn prop_free_flight_is_exact(p in -1.0e3f64..1.0e3, v in -1.0e3f64..1.0e3, dt in 0.0f64..10.0) {
            let obj = block(1.0, 1.0, v, p);
            prop_assert_eq!(obj.position_at(dt), p + v * dt);
        }
    }
}
