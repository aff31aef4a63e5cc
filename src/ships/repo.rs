use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ship {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub arrived_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewShip {
    pub name: String,
    pub email: Option<String>,
    pub arrived_at: Option<OffsetDateTime>,
}

/// Fields to overwrite; `None` leaves the stored value alone,
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipPatch {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub arrived_at: Option<Option<OffsetDateTime>>,
}

/// In-memory ship collection. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct ShipStore {
    ships: RwLock<BTreeMap<u64, Ship>>,
    next_id: AtomicU64,
}

impl Default for ShipStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ShipStore {
    pub fn new() -> Self {
        Self {
            ships: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub async fn list(&self) -> Vec<Ship> {
        self.ships.read().await.values().cloned().collect()
    }

    pub async fn get(&self, id: u64) -> Option<Ship> {
        self.ships.read().await.get(&id).cloned()
    }

    pub async fn create(&self, new: NewShip) -> Ship {
        let mut ships = self.ships.write().await;
        // bumped under the write lock so map order matches id order
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let ship = Ship {
            id,
            name: new.name,
            email: new.email,
            arrived_at: Some(new.arrived_at.unwrap_or_else(OffsetDateTime::now_utc)),
        };
        ships.insert(id, ship.clone());
        ship
    }

    pub async fn update(&self, id: u64, patch: ShipPatch) -> Option<Ship> {
        let mut ships = self.ships.write().await;
        let ship = ships.get_mut(&id)?;
        if let Some(name) = patch.name {
            ship.name = name;
        }
        if let Some(email) = patch.email {
            ship.email = email;
        }
        if let Some(arrived_at) = patch.arrived_at {
            ship.arrived_at = arrived_at;
        }
        Some(ship.clone())
    }

    pub async fn delete(&self, id: u64) -> bool {
        self.ships.write().await.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use time::macros::datetime;

    fn named(name: &str) -> NewShip {
        NewShip {
            name: name.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn ids_increase_and_are_not_reused() {
        let store = ShipStore::new();
        let a = store.create(named("Alpha")).await;
        let b = store.create(named("Bravo")).await;
        assert_eq!((a.id, b.id), (1, 2));

        assert!(store.delete(b.id).await);
        let c = store.create(named("Charlie")).await;
        assert_eq!(c.id, 3);

        let ids: Vec<u64> = store.list().await.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn create_defaults_arrival_to_now() {
        let store = ShipStore::new();
        let before = OffsetDateTime::now_utc();
        let ship = store.create(named("Alpha")).await;
        let after = OffsetDateTime::now_utc();
        let arrived = ship.arrived_at.expect("arrival set");
        assert!(arrived >= before && arrived <= after);

        let given = datetime!(1912-04-10 12:00:00 UTC);
        let ship = store
            .create(NewShip {
                arrived_at: Some(given),
                ..named("Titanic")
            })
            .await;
        assert_eq!(ship.arrived_at, Some(given));
    }

    #[tokio::test]
    async fn update_only_touches_given_fields() {
        let store = ShipStore::new();
        let ship = store
            .create(NewShip {
                name: "Alpha".into(),
                email: Some("a@b.com".into()),
                arrived_at: None,
            })
            .await;

        let updated = store
            .update(
                ship.id,
                ShipPatch {
                    name: Some("Beta".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("ship exists");
        assert_eq!(updated.id, ship.id);
        assert_eq!(updated.name, "Beta");
        assert_eq!(updated.email.as_deref(), Some("a@b.com"));
        assert_eq!(updated.arrived_at, ship.arrived_at);

        let cleared = store
            .update(
                ship.id,
                ShipPatch {
                    email: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.email, None);
        assert_eq!(cleared.name, "Beta");
    }

    #[tokio::test]
    async fn missing_ids_leave_store_untouched() {
        let store = ShipStore::new();
        store.create(named("Alpha")).await;
        let before = store.list().await;

        assert!(store.get(42).await.is_none());
        assert!(store
            .update(
                42,
                ShipPatch {
                    name: Some("Ghost".into()),
                    ..Default::default()
                }
            )
            .await
            .is_none());
        assert!(!store.delete(42).await);
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() {
        let store = ShipStore::new();
        let a = store.create(named("Alpha")).await;
        store.create(named("Bravo")).await;
        assert!(store.delete(a.id).await);
        assert!(store.get(a.id).await.is_none());
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_unique_ids() {
        let store = Arc::new(ShipStore::new());
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(named(&format!("ship-{i}"))).await.id })
            })
            .collect();
        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=64).collect::<Vec<u64>>());
    }
}
