use async_trait::async_trait;
use canteen_actors::{StoreActor, StoreClient, StoreEntity};
use std::collections::HashMap;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Badge {
    id: u32,
    holder: String,
    active: bool,
}

#[derive(Debug)]
struct BadgeCreate {
    holder: String,
}

#[derive(Debug)]
struct BadgeUpdate {
    holder: Option<String>,
}

#[derive(Debug)]
struct ActiveOnly;

#[derive(Debug)]
enum BadgeCommand {
    DeactivateAll,
}

#[derive(Debug)]
enum BadgeReply {
    Deactivated(usize),
}

#[derive(Debug, thiserror::Error)]
#[error("badge error")]
struct BadgeError;

#[async_trait]
impl StoreEntity for Badge {
    type Id = u32;
    type Create = BadgeCreate;
    type Update = BadgeUpdate;
    type Query = ActiveOnly;
    type Command = BadgeCommand;
    type Reply = BadgeReply;
    type Context = ();
    type Error = BadgeError;

    fn id(&self) -> &u32 {
        &self.id
    }

    fn from_create_params(id: u32, params: BadgeCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            holder: params.holder,
            active: true,
        })
    }

    fn matches(&self, _query: &ActiveOnly) -> bool {
        self.active
    }

    async fn apply(
        store: &mut HashMap<u32, Badge>,
        command: BadgeCommand,
        _ctx: &(),
    ) -> Result<BadgeReply, Self::Error> {
        match command {
            BadgeCommand::DeactivateAll => {
                let mut touched = 0;
                for badge in store.values_mut().filter(|b| b.active) {
                    badge.active = false;
                    touched += 1;
                }
                Ok(BadgeReply::Deactivated(touched))
            }
        }
    }

    async fn on_update(&mut self, update: BadgeUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(holder) = update.holder {
            self.holder = holder;
        }
        Ok(())
    }
}

// --- Tests ---

#[tokio::test]
async fn test_store_full_lifecycle() {
    let mut next = 0u32;
    let (actor, client): (_, StoreClient<Badge>) = StoreActor::new(10, move || {
        next += 1;
        next
    });
    tokio::spawn(actor.run(()));

    // 1. Create
    let id = client
        .create(BadgeCreate {
            holder: "Alice".into(),
        })
        .await
        .unwrap();
    assert_eq!(id, 1);

    // 2. Update
    let updated = client
        .update(
            id,
            BadgeUpdate {
                holder: Some("Bob".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.holder, "Bob");

    // 3. Query sees the active badge
    let active = client.query(ActiveOnly).await.unwrap();
    assert_eq!(active.len(), 1);

    // 4. Delete
    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_store_command_is_one_atomic_batch() {
    let mut next = 0u32;
    let (actor, client): (_, StoreClient<Badge>) = StoreActor::new(10, move || {
        next += 1;
        next
    });
    tokio::spawn(actor.run(()));

    for holder in ["Alice", "Bob", "Carol"] {
        client
            .create(BadgeCreate {
                holder: holder.into(),
            })
            .await
            .unwrap();
    }

    let BadgeReply::Deactivated(touched) =
        client.command(BadgeCommand::DeactivateAll).await.unwrap();
    assert_eq!(touched, 3);

    // The query filter no longer matches anything.
    let active = client.query(ActiveOnly).await.unwrap();
    assert!(active.is_empty());

    // A second batch run is a no-op.
    let BadgeReply::Deactivated(touched) =
        client.command(BadgeCommand::DeactivateAll).await.unwrap();
    assert_eq!(touched, 0);
}
