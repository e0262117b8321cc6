//! Skeleton topology.
//!
//! Landmark indices follow the 33-point body model the inference
//! service reports. Only a subset is named here; the connection table
//! covers the full figure.

/// Named landmark indices.
pub mod landmark {
    pub const NOSE: usize = 0;
    pub const LEFT_EYE: usize = 2;
    pub const RIGHT_EYE: usize = 5;
    pub const LEFT_EAR: usize = 7;
    pub const RIGHT_EAR: usize = 8;
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_ELBOW: usize = 13;
    pub const RIGHT_ELBOW: usize = 14;
    pub const LEFT_WRIST: usize = 15;
    pub const RIGHT_WRIST: usize = 16;
    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;
    pub const LEFT_KNEE: usize = 25;
    pub const RIGHT_KNEE: usize = 26;
    pub const LEFT_ANKLE: usize = 27;
    pub const RIGHT_ANKLE: usize = 28;
    pub const LEFT_FOOT_INDEX: usize = 31;
    pub const RIGHT_FOOT_INDEX: usize = 32;
}

/// Predefined anatomical connections, drawn as line segments.
///
/// Pairs of landmark indices; a connection whose endpoint is absent
/// from a result is simply skipped by the renderer.
pub const POSE_CONNECTIONS: &[(usize, usize)] = &[
    // Face
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 7),
    (0, 4),
    (4, 5),
    (5, 6),
    (6, 8),
    (9, 10),
    // Torso
    (11, 12),
    (11, 23),
    (12, 24),
    (23, 24),
    // Left arm
    (11, 13),
    (13, 15),
    (15, 17),
    (15, 19),
    (15, 21),
    (17, 19),
    // Right arm
    (12, 14),
    (14, 16),
    (16, 18),
    (16, 20),
    (16, 22),
    (18, 20),
    // Left leg
    (23, 25),
    (25, 27),
    (27, 29),
    (29, 31),
    (27, 31),
    // Right leg
    (24, 26),
    (26, 28),
    (28, 30),
    (30, 32),
    (28, 32),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connections_stay_within_the_body_model() {
        for &(a, b) in POSE_CONNECTIONS {
            assert!(a < 33, "index {} out of range", a);
            assert!(b < 33, "index {} out of range", b);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn named_landmarks_appear_in_connections() {
        let connected: Vec<usize> = POSE_CONNECTIONS
            .iter()
            .flat_map(|&(a, b)| [a, b])
            .collect();
        for idx in [
            landmark::LEFT_SHOULDER,
            landmark::RIGHT_HIP,
            landmark::LEFT_KNEE,
            landmark::RIGHT_ANKLE,
        ] {
            assert!(connected.contains(&idx));
        }
    }
}
