use crate::models::config::BannerConfig;
use crate::models::ui_state::{Banner, BannerKind};
use std::time::Duration;

/// Generation stamp handed to each scheduled auto-hide
pub type BannerTicket = u64;

/// Holds the single visible banner and decides which auto-hide timers may clear it
#[derive(Debug, Clone, Default)]
pub struct BannerSlot {
    current: Option<Banner>,
    generation: BannerTicket,
}

impl BannerSlot {
    pub fn current(&self) -> Option<&Banner> {
        self.current.as_ref()
    }

    /// Replace whatever banner is visible and return the ticket for its auto-hide
    pub fn show(&mut self, banner: Banner) -> BannerTicket {
        self.current = Some(banner);
        self.generation += 1;
        self.generation
    }

    /// Hide immediately without scheduling anything
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Fire an auto-hide timer. Returns true when the visible banner changed.
    ///
    /// With `reset_on_show`, only the ticket of the latest show may hide;
    /// otherwise any timer hides every banner.
    pub fn expire(&mut self, ticket: BannerTicket, reset_on_show: bool) -> bool {
        if reset_on_show && ticket != self.generation {
            return false;
        }
        self.current.take().is_some()
    }
}

/// Auto-hide delay for a banner kind
pub fn hide_after(kind: BannerKind, config: &BannerConfig) -> Duration {
    match kind {
        BannerKind::Error => config.error_duration(),
        BannerKind::Success => config.success_duration(),
    }
}
