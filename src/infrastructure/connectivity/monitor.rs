use crate::application::ports::{
    ConnectivityEvent, ConnectivitySource, ConnectivityState, ReachabilityProbe,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const EVENT_CAPACITY: usize = 64;

/// Binary online/offline state with edge-triggered transition events.
pub struct ConnectivityMonitor {
    online: AtomicBool,
    pinned_offline: bool,
    events: broadcast::Sender<ConnectivityEvent>,
}

impl ConnectivityMonitor {
    pub fn new(initially_online: bool) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            online: AtomicBool::new(initially_online),
            pinned_offline: false,
            events,
        })
    }

    /// A monitor that reports offline no matter what probes say.
    pub fn pinned_offline() -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            online: AtomicBool::new(false),
            pinned_offline: true,
            events,
        })
    }

    /// Initial state from one probe.
    pub async fn detect(probe: &dyn ReachabilityProbe) -> Arc<Self> {
        let online = probe.is_reachable().await;
        tracing::info!(
            target: "sync::connectivity",
            online,
            "initial connectivity detected"
        );
        Self::new(online)
    }

    /// Records a reachability observation. Returns true when it changed the state.
    pub fn set_online(&self, online: bool) -> bool {
        if self.pinned_offline {
            return false;
        }
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous == online {
            return false;
        }

        let event = if online {
            ConnectivityEvent::WentOnline
        } else {
            ConnectivityEvent::WentOffline
        };
        tracing::info!(target: "sync::connectivity", ?event, "connectivity changed");
        // No subscribers is fine.
        let _ = self.events.send(event);
        true
    }

    /// Re-probes every `interval` until the handle is aborted.
    pub fn spawn_polling(
        self: &Arc<Self>,
        probe: Arc<dyn ReachabilityProbe>,
        interval: Duration,
    ) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick fires immediately; the state is already known.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let online = probe.is_reachable().await;
                monitor.set_online(online);
            }
        })
    }
}

impl ConnectivitySource for ConnectivityMonitor {
    fn state(&self) -> ConnectivityState {
        ConnectivityState::from_online(self.online.load(Ordering::SeqCst))
    }

    fn subscribe(&self) -> broadcast::Receiver<ConnectivityEvent> {
        self.events.subscribe()
    }
}
