//! Delta-time driven palette color cycling.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use planarpaint_core::palette::rotate_range;
use planarpaint_core::EditorState;
use tracing::trace;

/// Identifies a usable range between ticks: its bounds and its position
/// among the usable ranges.
type RangeKey = (u8, u8, usize);

/// Advances color-cycle ranges from elapsed time.
///
/// Each usable range accumulates elapsed time on its own; once its interval
/// is crossed it rotates by as many whole steps as fit and keeps the
/// remainder. The frame scheduler calls [`tick`](Self::tick) with the
/// current time.
#[derive(Debug, Default)]
pub struct PaletteCycler {
    accumulators: HashMap<RangeKey, Duration>,
    last_tick: Option<Instant>,
}

impl PaletteCycler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last tick time so the time until the next tick is not
    /// counted.
    pub fn pause(&mut self) {
        self.last_tick = None;
    }

    /// Advance by the time since the previous tick. The first tick after
    /// creation or [`pause`](Self::pause) advances by zero.
    pub fn tick(&mut self, state: &mut EditorState, now: Instant) -> bool {
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);
        self.advance(state, elapsed)
    }

    /// Advance every usable range by `elapsed`. Returns whether any palette
    /// entry moved.
    pub fn advance(&mut self, state: &mut EditorState, elapsed: Duration) -> bool {
        let palette = state.palette();
        let len = palette.len();
        let usable: Vec<_> = palette
            .cycles()
            .iter()
            .filter(|c| c.is_usable(len))
            .copied()
            .collect();
        if !state.view().cycle_animation_enabled || usable.is_empty() {
            self.accumulators.clear();
            return false;
        }

        let mut colors = palette.colors().to_vec();
        let mut rotated = false;
        let mut live = Vec::with_capacity(usable.len());

        for (position, cycle) in usable.iter().enumerate() {
            let key = (cycle.low, cycle.high, position);
            live.push(key);
            let interval = cycle.interval();
            let carry = self.accumulators.get(&key).copied().unwrap_or_default() + elapsed;
            if carry < interval {
                self.accumulators.insert(key, carry);
                continue;
            }
            let steps = carry.as_nanos() / interval.as_nanos();
            let spent = interval.as_nanos() * steps;
            let remainder = Duration::from_nanos((carry.as_nanos() - spent) as u64);
            self.accumulators.insert(key, remainder);
            let steps = i64::try_from(steps).unwrap_or(i64::MAX);
            if rotate_range(&mut colors, cycle.low as usize, cycle.high as usize, steps) {
                trace!("Cycled {}..={} by {}", cycle.low, cycle.high, steps);
                rotated = true;
            }
        }
        self.accumulators.retain(|key, _| live.contains(key));

        if rotated {
            state.set_palette_colors(colors);
        }
        rotated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planarpaint_core::{CycleRange, ViewSettings};

    fn cycling_state(cycles: Vec<CycleRange>) -> EditorState {
        let mut state = EditorState::default();
        state.update_view(|v| ViewSettings {
            cycle_animation_enabled: true,
            ..v
        });
        state.set_palette_cycles(cycles);
        state
    }

    #[test]
    fn rotates_once_interval_is_crossed() {
        // rate 10 → 100 ms per step
        let mut state = cycling_state(vec![CycleRange::new(10, 0, 3, true)]);
        let original = state.palette().colors().to_vec();
        let mut cycler = PaletteCycler::new();

        assert!(!cycler.advance(&mut state, Duration::from_millis(60)));
        assert!(cycler.advance(&mut state, Duration::from_millis(60)));
        let colors = state.palette().colors();
        assert_eq!(colors[0], original[3]);
        assert_eq!(colors[1], original[0]);
        assert_eq!(colors[2], original[1]);
        assert_eq!(colors[3], original[2]);

        // 20 ms carried over, so 150 more is exactly one step
        assert!(cycler.advance(&mut state, Duration::from_millis(150)));
        assert_eq!(state.palette().colors()[0], original[2]);
    }

    #[test]
    fn large_delta_takes_several_steps() {
        let mut state = cycling_state(vec![CycleRange::new(10, 0, 3, true)]);
        let original = state.palette().colors().to_vec();
        let mut cycler = PaletteCycler::new();
        assert!(cycler.advance(&mut state, Duration::from_millis(300)));
        assert_eq!(state.palette().colors()[3], original[0]);
    }

    #[test]
    fn disabled_animation_resets_accumulators() {
        let mut state = cycling_state(vec![CycleRange::new(10, 0, 3, true)]);
        let mut cycler = PaletteCycler::new();
        cycler.advance(&mut state, Duration::from_millis(90));
        state.update_view(|v| ViewSettings {
            cycle_animation_enabled: false,
            ..v
        });
        assert!(!cycler.advance(&mut state, Duration::from_millis(90)));
        state.update_view(|v| ViewSettings {
            cycle_animation_enabled: true,
            ..v
        });
        assert!(!cycler.advance(&mut state, Duration::from_millis(90)));
    }

    #[test]
    fn ranges_are_timed_independently() {
        let mut state = cycling_state(vec![
            CycleRange::new(10, 0, 1, true),
            CycleRange::new(0, 4, 5, true),
            CycleRange::new(10, 8, 9, false),
        ]);
        let original = state.palette().colors().to_vec();
        let mut cycler = PaletteCycler::new();
        assert!(cycler.advance(&mut state, Duration::from_millis(100)));
        let colors = state.palette().colors();
        assert_eq!(colors[0], original[1]);
        assert_eq!(colors[4], original[4]);
        assert_eq!(colors[8], original[8]);

        assert!(cycler.advance(&mut state, Duration::from_millis(150)));
        assert_eq!(state.palette().colors()[4], original[5]);
    }

    #[test]
    fn tick_ignores_time_spent_paused() {
        let mut state = cycling_state(vec![CycleRange::new(10, 0, 3, true)]);
        let mut cycler = PaletteCycler::new();
        let t0 = Instant::now();
        assert!(!cycler.tick(&mut state, t0));
        cycler.pause();
        assert!(!cycler.tick(&mut state, t0 + Duration::from_secs(5)));
        assert!(cycler.tick(&mut state, t0 + Duration::from_millis(5_100)));
    }
}
