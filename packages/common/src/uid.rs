use crc32fast::Hasher;

/// Opaque process-unique identifier for elements, areas and breakpoints.
///
/// UIDs are session-local registry keys, not a universal addressing scheme:
/// persisted content always expands children inline rather than by UID.
pub type Uid = String;

/// Derive a short stable seed from a session key using CRC32
pub fn get_session_seed(key: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential UID generator scoped to one editing session
#[derive(Debug, Clone)]
pub struct UidGenerator {
    seed: String, // Session seed (CRC32)
    count: u32,   // Sequential counter
}

impl UidGenerator {
    pub fn new(session_key: &str) -> Self {
        Self {
            seed: get_session_seed(session_key),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate the next UID
    pub fn new_uid(&mut self) -> Uid {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Get the session seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_seed_is_stable() {
        let seed1 = get_session_seed("post-42");
        let seed2 = get_session_seed("post-42");

        // Same key always generates the same seed
        assert_eq!(seed1, seed2);

        // Different keys generate different seeds
        let seed3 = get_session_seed("post-43");
        assert_ne!(seed1, seed3);
    }

    #[test]
    fn test_sequential_uids() {
        let mut gen = UidGenerator::new("post-42");

        let uid1 = gen.new_uid();
        let uid2 = gen.new_uid();
        let uid3 = gen.new_uid();

        // UIDs are sequential
        assert!(uid1.ends_with("-1"));
        assert!(uid2.ends_with("-2"));
        assert!(uid3.ends_with("-3"));

        // All share the same seed
        let seed = gen.seed();
        assert!(uid1.starts_with(seed));
        assert!(uid2.starts_with(seed));
        assert!(uid3.starts_with(seed));
    }

    #[test]
    fn test_uids_are_unique() {
        let mut gen = UidGenerator::from_seed("abc".to_string());
        let mut seen = std::collections::HashSet::new();

        for _ in 0..1000 {
            assert!(seen.insert(gen.new_uid()));
        }
    }
}
