use garden_game::Clock;

use crate::dom;

/// Clock backed by `Date.now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> u64 {
        dom::now_ms()
    }
}
