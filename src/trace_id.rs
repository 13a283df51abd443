//! Identifiers for trace hops.
//!
//! Ids are version 7 uuids in their simple form: 32 lowercase hex characters
//! starting with the millisecond unix timestamp, so ids sort by creation time.
//! Generation needs no coordination between requests, hosts or processes.

use uuid::Uuid;

/// Generates a new hop identifier.
pub fn generate() -> String {
    Uuid::now_v7().simple().to_string()
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, thread, time::Duration};

    use super::*;

    #[test]
    fn generated_ids_do_not_collide() {
        let ids: HashSet<String> = (0..100_000).map(|_| generate()).collect();
        assert_eq!(ids.len(), 100_000);
    }

    #[test]
    fn generated_ids_do_not_collide_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| (0..10_000).map(|_| generate()).collect::<Vec<_>>()))
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(ids.insert(id));
            }
        }
        assert_eq!(ids.len(), 80_000);
    }

    #[test]
    fn hex_form_is_32_lowercase_chars() {
        let id = generate();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 7);
    }

    #[test]
    fn later_ids_sort_after_earlier_ones() {
        let first = generate();
        thread::sleep(Duration::from_millis(2));
        let later = generate();

        assert!(later > first);
    }
}
