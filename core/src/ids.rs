use uuid::Uuid;

/// Generates an id for a note or element: a UUIDv7, so a millisecond
/// timestamp prefix with a random suffix. Collisions are statistically
/// prevented, not formally, which is enough for a single-user dataset.
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_distinct() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
