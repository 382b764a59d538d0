/// A directory view that lives for the whole process and is shared by every client.
///
/// A single task owns the controller. Criteria changes arrive over a channel;
/// query changes are quieted first, so a burst of keystrokes produces one
/// recompute with the last value. Each render is published on a watch channel.
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use crate::controller::DirectoryController;
use crate::engine::{Criteria, CriteriaChange};
use crate::error::AppError;
use crate::quiet::Quieter;
use crate::render::{RenderedView, ViewSurface};

#[derive(Debug, Clone)]
pub struct Published {
    pub generation: u64,
    pub criteria: Criteria,
    pub view: RenderedView,
}

struct Command {
    change: CriteriaChange,
    reply: oneshot::Sender<Published>,
}

#[derive(Clone)]
pub struct LiveDirectory {
    commands: mpsc::UnboundedSender<Command>,
    published: watch::Receiver<Published>,
}

impl LiveDirectory {
    pub fn spawn(controller: DirectoryController<ViewSurface>, quiet: Duration) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let (tx, published) = watch::channel(snapshot(&controller, 0));
        tokio::spawn(run(controller, quiet, rx, tx));
        Self {
            commands,
            published,
        }
    }

    pub fn current(&self) -> Published {
        self.published.borrow().clone()
    }

    /// Send one change and wait for the first render that includes it.
    ///
    /// When a query change is superseded during its quiet period, the caller
    /// receives the render of the superseding value.
    pub async fn update(&self, change: CriteriaChange) -> Result<Published, AppError> {
        let (reply, rendered) = oneshot::channel();
        self.commands
            .send(Command { change, reply })
            .map_err(|_| AppError::LiveClosed)?;
        rendered.await.map_err(|_| AppError::LiveClosed)
    }
}

fn snapshot(controller: &DirectoryController<ViewSurface>, generation: u64) -> Published {
    Published {
        generation,
        criteria: controller.criteria().clone(),
        view: controller.surface().snapshot().clone(),
    }
}

async fn run(
    mut controller: DirectoryController<ViewSurface>,
    quiet: Duration,
    mut commands: mpsc::UnboundedReceiver<Command>,
    tx: watch::Sender<Published>,
) {
    let mut quieter: Quieter<String> = Quieter::new(quiet);
    // Callers whose change is in the next render.
    let mut waiting: Vec<oneshot::Sender<Published>> = Vec::new();
    let mut generation = 0u64;

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(Command { change, reply }) = command else {
                    break;
                };
                waiting.push(reply);
                match change {
                    CriteriaChange::Query(query) if !quiet.is_zero() => {
                        debug!(query = %query, "query change quieted");
                        quieter.push(query);
                        continue;
                    }
                    change => {
                        // A pending query was typed before this change; it must not be lost.
                        if let Some(query) = quieter.take() {
                            controller.stage(CriteriaChange::Query(query));
                        }
                        controller.apply(change);
                    }
                }
            }
            query = quieter.settled(), if quieter.is_pending() => {
                controller.apply(CriteriaChange::Query(query));
            }
        }

        generation += 1;
        let published = snapshot(&controller, generation);
        tx.send_replace(published.clone());
        for reply in waiting.drain(..) {
            // The caller may have given up waiting.
            let _ = reply.send(published.clone());
        }
    }

    info!("live directory stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::{Filter, SearchFields, SortKey};
    use crate::model::{Record, RecordId, Tier};
    use crate::render::RenderConfig;
    use crate::store::RecordStore;

    fn live(quiet: Duration) -> LiveDirectory {
        let record = |id: i64, name: &str, tier: Tier| Record {
            id: RecordId::Number(id),
            name: name.to_string(),
            category: "Retail".to_string(),
            tier,
            description: String::new(),
            established: None,
            address: None,
            phone: None,
            website: None,
            image: None,
        };
        let store = Arc::new(RecordStore::from_records(vec![
            record(1, "Alpha Inc", Tier::Silver),
            record(2, "Alpine Outfitters", Tier::Gold),
            record(3, "Zeta Corp", Tier::Gold),
        ]));
        let controller = DirectoryController::new(
            store,
            SearchFields::default(),
            ViewSurface::default(),
            RenderConfig::default(),
        );
        LiveDirectory::spawn(controller, quiet)
    }

    #[tokio::test]
    async fn initial_render_is_published() {
        let live = live(Duration::ZERO);
        let current = live.current();
        assert_eq!(current.generation, 0);
        assert_eq!(current.view.cards.len(), 3);
    }

    #[tokio::test]
    async fn non_query_changes_render_immediately() {
        let live = live(Duration::from_millis(300));
        let published = live
            .update(CriteriaChange::Tier("gold".to_string()))
            .await
            .unwrap();
        assert_eq!(published.generation, 1);
        assert_eq!(published.view.count_text, "2 businesses found");
    }

    #[tokio::test(start_paused = true)]
    async fn query_burst_renders_once_with_latest_value() {
        let live = live(Duration::from_millis(300));

        let first = {
            let live = live.clone();
            tokio::spawn(async move { live.update(CriteriaChange::Query("a".to_string())).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = {
            let live = live.clone();
            tokio::spawn(async move { live.update(CriteriaChange::Query("alp".to_string())).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        let last = live
            .update(CriteriaChange::Query("alpine".to_string()))
            .await
            .unwrap();

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();

        assert_eq!(last.generation, 1);
        assert_eq!(last.criteria.query, "alpine");
        assert_eq!(last.view.cards.len(), 1);
        assert_eq!(last.view.cards[0].name, "Alpine Outfitters");
        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 1);
        assert_eq!(first.criteria.query, "alpine");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_each_see_their_own_change() {
        for _ in 0..50 {
            let live = live(Duration::from_millis(300));
            let send = |change: CriteriaChange| {
                let live = live.clone();
                tokio::spawn(async move { live.update(change).await })
            };
            let tier = send(CriteriaChange::Tier("gold".to_string()));
            let sort = send(CriteriaChange::Sort("name-desc".to_string()));
            let category = send(CriteriaChange::Category("retail".to_string()));

            let tier = tier.await.unwrap().unwrap();
            let sort = sort.await.unwrap().unwrap();
            let category = category.await.unwrap().unwrap();
            assert_eq!(tier.criteria.tier, Filter::Only(Tier::Gold));
            assert_eq!(sort.criteria.sort, SortKey::NameDesc);
            assert_eq!(category.criteria.category, Filter::Only("retail".to_string()));
            assert_eq!(live.current().generation, 3);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn pending_query_is_flushed_by_other_changes() {
        let live = live(Duration::from_millis(300));
        let typing = {
            let live = live.clone();
            tokio::spawn(async move { live.update(CriteriaChange::Query("zeta".to_string())).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let sorted = live
            .update(CriteriaChange::Sort("name-desc".to_string()))
            .await
            .unwrap();
        assert_eq!(sorted.criteria.query, "zeta");
        assert_eq!(sorted.view.cards.len(), 1);
        assert_eq!(typing.await.unwrap().unwrap().generation, 1);
    }
}
