use std::time::Duration;

use log::trace;

use crate::cursor::{SurfaceRect, TreeSurface};

/// Tick period of the auto-scroll timer while dragging.
pub const SCROLL_INTERVAL: Duration = Duration::from_millis(20);

/// Signed auto-scroll speed in `[-1, 1]` for a pointer at `y`.
///
/// Inside the bottom band the speed grows linearly from 0 at the band's inner
/// edge to 1 at the list's bottom edge; the top band mirrors it with negative
/// speeds. Outside both bands the speed is 0.
pub fn scroll_speed(y: f64, bounds: SurfaceRect, band: f64) -> f64 {
    if band <= 0.0 {
        return 0.0;
    }
    let bottom_line = bounds.bottom() - band;
    let down = (y - bottom_line) / band;
    if down > 0.0 {
        return down.min(1.0);
    }
    let top_line = bounds.top() + band;
    let up = (top_line - y) / band;
    if up > 0.0 {
        return -up.min(1.0);
    }
    0.0
}

/// Auto-scroll timer driven by the host's event loop.
///
/// The host calls [`AutoScroll::tick`] every [`SCROLL_INTERVAL`] while the
/// timer runs. Ticks only move the surface's scroll offset; tree data is
/// never touched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AutoScroll {
    speed: f64,
    running: bool,
}

impl AutoScroll {
    pub const fn new() -> Self {
        Self {
            speed: 0.0,
            running: false,
        }
    }

    #[inline]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Starts (or retargets) the timer. Restarting with the same speed is a no-op.
    pub fn start(&mut self, speed: f64) {
        if self.running && self.speed.total_cmp(&speed).is_eq() {
            return;
        }
        trace!("auto-scroll start speed={speed:.3}");
        self.speed = speed;
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            trace!("auto-scroll stop");
        }
        self.speed = 0.0;
        self.running = false;
    }

    /// Applies one timer period to the surface; returns the requested delta.
    pub fn tick<S: TreeSurface + ?Sized>(&self, surface: &mut S, max_speed: f64) -> f64 {
        if !self.running {
            return 0.0;
        }
        let delta = max_speed * self.speed;
        surface.scroll_by(delta);
        delta
    }

    /// Updates the timer from the pointer's vertical position.
    pub fn follow(&mut self, y: f64, bounds: SurfaceRect, band: f64) {
        let speed = scroll_speed(y, bounds, band);
        if speed.abs() <= f64::EPSILON {
            self.stop();
        } else {
            self.start(speed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::tests::RowSurface;

    const BOUNDS: SurfaceRect = SurfaceRect::new(0.0, 100.0, 50.0, 400.0);

    #[test]
    fn speed_is_zero_outside_bands() {
        assert!(scroll_speed(300.0, BOUNDS, 70.0).abs() < f64::EPSILON);
        assert!(scroll_speed(170.0, BOUNDS, 70.0).abs() < f64::EPSILON);
        assert!(scroll_speed(430.0, BOUNDS, 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn speed_scales_linearly_inside_bands() {
        assert!((scroll_speed(465.0, BOUNDS, 70.0) - 0.5).abs() < 1e-9);
        assert!((scroll_speed(500.0, BOUNDS, 70.0) - 1.0).abs() < 1e-9);
        assert!((scroll_speed(135.0, BOUNDS, 70.0) + 0.5).abs() < 1e-9);
        assert!((scroll_speed(100.0, BOUNDS, 70.0) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn speed_is_clamped_past_the_edge() {
        assert!((scroll_speed(900.0, BOUNDS, 70.0) - 1.0).abs() < 1e-9);
        assert!((scroll_speed(-50.0, BOUNDS, 70.0) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn ticks_scroll_only_while_running() {
        let mut surface = RowSurface::new(Vec::new(), 20.0, 200.0);
        let mut timer = AutoScroll::new();
        assert!(timer.tick(&mut surface, 20.0).abs() < f64::EPSILON);

        timer.start(0.5);
        timer.tick(&mut surface, 20.0);
        timer.tick(&mut surface, 20.0);
        assert!((surface.scroll - 20.0).abs() < 1e-9);

        timer.stop();
        timer.tick(&mut surface, 20.0);
        assert!((surface.scroll - 20.0).abs() < 1e-9);
        assert!(!timer.is_running());
    }

    #[test]
    fn follow_starts_and_stops() {
        let mut timer = AutoScroll::new();
        timer.follow(480.0, BOUNDS, 70.0);
        assert!(timer.is_running());
        assert!(timer.speed() > 0.0);
        timer.follow(300.0, BOUNDS, 70.0);
        assert!(!timer.is_running());
    }
}
