use std::sync::atomic::{AtomicU8, Ordering};

/// Source of packet identifiers.
///
/// Identifiers wrap around modulo 256. Share one generator (behind an `Arc`)
/// between everything sending requests over the same socket.
#[derive(Debug, Default)]
pub struct PacketIdGenerator {
    next: AtomicU8,
}

impl PacketIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator whose first identifier is `first`
    pub fn starting_at(first: u8) -> Self {
        PacketIdGenerator {
            next: AtomicU8::new(first),
        }
    }

    pub fn next_id(&self) -> u8 {
        // fetch_add wraps on overflow
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_wraps_modulo_256() {
        let ids = PacketIdGenerator::starting_at(254);
        assert_eq!(ids.next_id(), 254);
        assert_eq!(ids.next_id(), 255);
        assert_eq!(ids.next_id(), 0);
    }

    #[test]
    fn test_concurrent_ids_unique() {
        let ids = Arc::new(PacketIdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..64).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), 256);
    }
}
