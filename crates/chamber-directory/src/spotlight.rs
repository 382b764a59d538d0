use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Record, Tier};
use crate::store::{fallback_records, RecordStore};

pub const DEFAULT_SPOTLIGHTS: usize = 3;
pub const MAX_SPOTLIGHTS: usize = 10;

#[derive(Debug, Clone)]
pub struct Spotlights {
    pub members: Vec<Record>,
    pub from_fallback: bool,
}

/// Pick up to `count` gold members at random.
///
/// Falls back to the built-in member set when the store has no gold members.
pub fn pick_spotlights<R: Rng + ?Sized>(store: &RecordStore, count: usize, rng: &mut R) -> Spotlights {
    let gold: Vec<Record> = store
        .records()
        .iter()
        .filter(|r| r.tier == Tier::Gold)
        .cloned()
        .collect();

    let (mut pool, from_fallback) = if gold.is_empty() {
        (fallback_records(), true)
    } else {
        (gold, store.is_fallback())
    };

    pool.shuffle(rng);
    pool.truncate(count.min(MAX_SPOTLIGHTS));
    Spotlights {
        members: pool,
        from_fallback,
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::model::RecordId;

    fn member(id: i64, tier: Tier) -> Record {
        Record {
            id: RecordId::Number(id),
            name: format!("Member {id}"),
            category: "Retail".to_string(),
            tier,
            description: String::new(),
            established: None,
            address: None,
            phone: None,
            website: None,
            image: None,
        }
    }

    #[test]
    fn only_gold_members_are_spotlighted() {
        let store = RecordStore::from_records(vec![
            member(1, Tier::Gold),
            member(2, Tier::Silver),
            member(3, Tier::Gold),
            member(4, Tier::Gold),
            member(5, Tier::Gold),
            member(6, Tier::Nonprofit),
        ]);
        let mut rng = StdRng::seed_from_u64(7);
        let picked = pick_spotlights(&store, DEFAULT_SPOTLIGHTS, &mut rng);
        assert!(!picked.from_fallback);
        assert_eq!(picked.members.len(), 3);
        assert!(picked.members.iter().all(|m| m.tier == Tier::Gold));

        let mut ids: Vec<String> = picked.members.iter().map(|m| m.id.to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn fewer_golds_than_requested() {
        let store = RecordStore::from_records(vec![member(1, Tier::Gold), member(2, Tier::Bronze)]);
        let picked = pick_spotlights(&store, 3, &mut StdRng::seed_from_u64(1));
        assert_eq!(picked.members.len(), 1);
    }

    #[test]
    fn no_golds_uses_fallback_members() {
        let store = RecordStore::from_records(vec![member(1, Tier::Silver)]);
        let picked = pick_spotlights(&store, 3, &mut StdRng::seed_from_u64(1));
        assert!(picked.from_fallback);
        assert_eq!(picked.members.len(), 3);
    }

    #[test]
    fn count_is_capped() {
        let store = RecordStore::fallback();
        let picked = pick_spotlights(&store, 50, &mut StdRng::seed_from_u64(1));
        assert_eq!(picked.members.len(), 7);
        assert!(picked.from_fallback);
    }
}
