use runtime::{EventBus, Subscription};
use scene::{Basemap, CameraOptions};
use tracing::debug;

use crate::deck::ViewerEvent;

/// Result of one [`CameraSync::pump`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No view-state change was queued.
    Idle,
    /// The basemap jumped to the latest pose. `events == 0` when a held
    /// pose was retried.
    Applied { events: usize },
    /// The basemap is still loading; the latest pose is held.
    Deferred { events: usize },
}

/// Forwards overlay camera changes to the basemap, one way only.
///
/// The five pose values are applied together as a single instant jump. The
/// basemap camera is never read back into the overlay.
#[derive(Debug)]
pub struct CameraSync {
    subscription: Subscription,
    pending: Option<CameraOptions>,
}

impl CameraSync {
    pub fn new(bus: &mut EventBus<ViewerEvent>) -> Self {
        Self {
            subscription: bus.subscribe(),
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<&CameraOptions> {
        self.pending.as_ref()
    }

    /// Drains queued view-state changes. Only the latest pose reaches the
    /// basemap; earlier ones in the same batch are superseded. With nothing
    /// queued, a pose held back earlier is retried once the basemap is ready.
    pub fn pump<B: Basemap>(
        &mut self,
        bus: &mut EventBus<ViewerEvent>,
        basemap: &mut B,
    ) -> SyncOutcome {
        let events = bus.pending(&self.subscription);
        let camera = match bus.drain_latest(&self.subscription) {
            Some(latest) => {
                let ViewerEvent::ViewStateChanged(view_state) = &latest.event;
                CameraOptions::from(view_state)
            }
            None => match self.pending {
                Some(held) if basemap.is_loaded() => held,
                _ => return SyncOutcome::Idle,
            },
        };

        if !basemap.is_loaded() {
            debug!(events, "basemap not ready, deferring camera jump");
            self.pending = Some(camera);
            return SyncOutcome::Deferred { events };
        }

        self.pending = None;
        basemap.jump_to(camera);
        SyncOutcome::Applied { events }
    }

    /// Applies the pose held back while the basemap was loading.
    pub fn on_basemap_loaded<B: Basemap>(&mut self, basemap: &mut B) -> bool {
        if !basemap.is_loaded() {
            return false;
        }
        match self.pending.take() {
            Some(camera) => {
                debug!("basemap loaded, applying deferred camera jump");
                basemap.jump_to(camera);
                true
            }
            None => false,
        }
    }

    pub fn detach(self, bus: &mut EventBus<ViewerEvent>) -> usize {
        bus.unsubscribe(self.subscription)
    }
}
