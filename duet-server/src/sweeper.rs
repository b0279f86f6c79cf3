use std::sync::Arc;
use std::time::Duration;

use duet_core::RoomService;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::hub::Hub;

/// Periodically delete rooms idle for longer than `ttl` and drop their
/// push-channel connections.
pub fn spawn(
    service: Arc<RoomService>,
    hub: Arc<Hub>,
    ttl: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            for code in service.sweep_stale(ttl) {
                hub.drop_room(&code);
                tracing::info!("Expired room {}", code);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use duet_core::GameConfigOverrides;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_sweeper_expires_idle_rooms() {
        let service = Arc::new(RoomService::in_memory());
        let hub = Arc::new(Hub::new());
        let room = service
            .create_room("host", &GameConfigOverrides::default())
            .unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        hub.register(room.code(), "host", tx);

        let handle = spawn(
            service.clone(),
            hub.clone(),
            Duration::from_millis(5),
            Duration::from_millis(10),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert_eq!(service.room_count(), 0);
        assert_eq!(hub.connection_count(room.code()), 0);
    }

    #[tokio::test]
    async fn test_sweeper_keeps_fresh_rooms() {
        let service = Arc::new(RoomService::in_memory());
        service
            .create_room("host", &GameConfigOverrides::default())
            .unwrap();

        let handle = spawn(
            service.clone(),
            Arc::new(Hub::new()),
            Duration::from_secs(3600),
            Duration::from_millis(10),
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        assert_eq!(service.room_count(), 1);
    }
}
