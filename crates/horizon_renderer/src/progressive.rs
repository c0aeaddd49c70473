//! Progressive scanline rendering.
//!
//! The frame is filled a few rows per call so each host frame stays cheap.
//! Rows above the cursor belong to the camera of the call that wrote them;
//! rows at or below it may still show an older orientation until the scan
//! reaches them. A camera change is handled by restarting from row 0, never
//! by clearing the buffer.

use rayon::prelude::*;

use crate::config::{ConfigError, RenderConfig, SceneConfig};
use crate::renderer::ScanlineTracer;
use crate::{Camera, ImageBuffer};

/// Whether a scan is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Last scan finished; `step` does nothing until `start`
    Complete,
    /// Rows from `next_row` down are still pending
    Scanning { next_row: u32 },
}

/// Renders one image progressively across many calls.
pub struct ProgressiveRenderer {
    frame: ImageBuffer,
    state: ScanState,
    config: RenderConfig,
    scene: SceneConfig,
}

impl ProgressiveRenderer {
    /// Create a renderer with a scan already pending from row 0.
    pub fn new(config: RenderConfig, scene: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        scene.validate()?;

        log::info!(
            "Progressive renderer {}x{}, {} rows per step",
            config.width,
            config.height,
            config.rows_per_step
        );

        Ok(Self {
            frame: ImageBuffer::filled(config.width, config.height, config.background),
            state: ScanState::Scanning { next_row: 0 },
            config,
            scene,
        })
    }

    /// Restart the scan from the top row, from any state.
    pub fn start(&mut self) {
        if let ScanState::Scanning { next_row } = self.state {
            if next_row > 0 {
                log::debug!("Restarting scan, discarding progress at row {}", next_row);
            }
        }
        self.state = ScanState::Scanning { next_row: 0 };
    }

    /// Render the next `rows_per_call` rows. No-op when the scan is complete.
    pub fn step(&mut self, camera: &Camera, rows_per_call: u32) {
        let Some((start, end)) = self.next_batch(rows_per_call) else {
            return;
        };

        let tracer = ScanlineTracer::new(camera, &self.scene, &self.config);
        for y in start..end {
            tracer.trace_row(y, self.frame.row_mut(y));
        }

        self.advance(end);
    }

    /// Same contract as [`ProgressiveRenderer::step`], with the batch's rows
    /// rendered in parallel. Each worker owns a disjoint row and reads the
    /// same camera, which cannot change while it is borrowed here.
    pub fn step_parallel(&mut self, camera: &Camera, rows_per_call: u32) {
        let Some((start, end)) = self.next_batch(rows_per_call) else {
            return;
        };

        let tracer = ScanlineTracer::new(camera, &self.scene, &self.config);
        let width = self.config.width as usize;
        self.frame
            .rows_mut(start, end)
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(i, row)| tracer.trace_row(start + i as u32, row));

        self.advance(end);
    }

    /// Rows `[start, end)` for the next call, or `None` when idle.
    fn next_batch(&self, rows_per_call: u32) -> Option<(u32, u32)> {
        match self.state {
            ScanState::Complete => None,
            ScanState::Scanning { next_row } => {
                // Zero would never finish the scan
                let rows = rows_per_call.max(1);
                Some((next_row, next_row.saturating_add(rows).min(self.config.height)))
            }
        }
    }

    fn advance(&mut self, end: u32) {
        if end >= self.config.height {
            log::debug!("Scan complete ({} rows)", self.config.height);
            self.state = ScanState::Complete;
        } else {
            self.state = ScanState::Scanning { next_row: end };
        }
    }

    /// True while rows remain to be rendered.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ScanState::Scanning { .. })
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Scan cursor; equals the image height once complete.
    pub fn next_row(&self) -> u32 {
        match self.state {
            ScanState::Complete => self.config.height,
            ScanState::Scanning { next_row } => next_row,
        }
    }

    /// Fraction of rows rendered for the current scan.
    pub fn progress(&self) -> f32 {
        self.next_row() as f32 / self.config.height as f32
    }

    /// The pixel buffer, including rows not yet refreshed by the current scan.
    pub fn frame(&self) -> &ImageBuffer {
        &self.frame
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneConfig {
        &self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render;

    fn renderer(width: u32, height: u32) -> ProgressiveRenderer {
        let config = RenderConfig {
            width,
            height,
            ..Default::default()
        };
        ProgressiveRenderer::new(config, SceneConfig::default()).unwrap()
    }

    fn tilted_camera() -> Camera {
        Camera::new().with_orbit(30.0, 0.6, 0.35)
    }

    #[test]
    fn test_starts_scanning() {
        let r = renderer(8, 6);
        assert!(r.is_active());
        assert_eq!(r.next_row(), 0);
        assert_eq!(r.progress(), 0.0);
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = RenderConfig {
            height: 0,
            ..Default::default()
        };
        assert!(ProgressiveRenderer::new(config, SceneConfig::default()).is_err());

        let scene = SceneConfig {
            disk_inner_radius: 9.0,
            ..Default::default()
        };
        assert!(ProgressiveRenderer::new(RenderConfig::default(), scene).is_err());
    }

    #[test]
    fn test_oversized_frame_fails_before_allocating() {
        let config = RenderConfig {
            width: 65536,
            height: 65536,
            ..Default::default()
        };
        assert!(matches!(
            ProgressiveRenderer::new(config, SceneConfig::default()),
            Err(ConfigError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn test_completes_after_ceil_steps() {
        let camera = tilted_camera();
        for &(height, rows) in &[(150, 20), (150, 50), (7, 3), (5, 1), (4, 10)] {
            let mut r = renderer(16, height);
            let expected = height.div_ceil(rows);

            let mut calls = 0;
            while r.is_active() {
                r.step(&camera, rows);
                calls += 1;
                assert!(r.next_row() <= height);
            }
            assert_eq!(calls, expected, "height {height}, rows {rows}");
            assert_eq!(r.state(), ScanState::Complete);
            assert_eq!(r.next_row(), height);
        }
    }

    #[test]
    fn test_matches_whole_frame_render() {
        let camera = tilted_camera();
        let mut r = renderer(200, 150);
        while r.is_active() {
            r.step(&camera, 20);
        }

        let reference = render(&camera, r.scene(), r.config());
        assert_eq!(r.frame(), &reference);
    }

    #[test]
    fn test_parallel_step_matches_serial() {
        let camera = Camera::new().with_orbit(45.0, -1.0, 0.9);
        let mut serial = renderer(64, 48);
        let mut parallel = renderer(64, 48);

        let mut serial_calls = 0;
        while serial.is_active() {
            serial.step(&camera, 7);
            serial_calls += 1;
        }
        let mut parallel_calls = 0;
        while parallel.is_active() {
            parallel.step_parallel(&camera, 7);
            parallel_calls += 1;
        }

        assert_eq!(serial_calls, parallel_calls);
        assert_eq!(serial.frame(), parallel.frame());
    }

    #[test]
    fn test_step_when_complete_is_noop() {
        let camera = tilted_camera();
        let mut r = renderer(8, 4);
        r.step(&camera, 4);
        assert!(!r.is_active());

        let before = r.frame().clone();
        r.step(&camera.clone().with_orbit(10.0, 2.0, -1.0), 4);
        assert_eq!(r.frame(), &before);
    }

    #[test]
    fn test_partial_step_writes_only_batch_rows() {
        let config = RenderConfig {
            width: 200,
            height: 150,
            ..Default::default()
        };
        let mut r = ProgressiveRenderer::new(config.clone(), SceneConfig::default()).unwrap();
        let camera = Camera::new().with_orbit(50.0, 0.0, 1.2);
        r.step(&camera, 20);

        let reference = render(&camera, r.scene(), &config);
        for y in 0..20 {
            assert_eq!(r.frame().row(y), reference.row(y));
        }
        // Untouched rows keep their previous contents
        for y in 20..150 {
            assert!(r.frame().row(y).iter().all(|&p| p == config.background));
        }
        assert_eq!(r.next_row(), 20);
    }

    #[test]
    fn test_zero_rows_still_progresses() {
        let camera = tilted_camera();
        let mut r = renderer(4, 3);
        r.step(&camera, 0);
        assert_eq!(r.next_row(), 1);
    }

    #[test]
    fn test_restart_discards_stale_rows() {
        let before = Camera::new().with_orbit(50.0, 0.0, 1.2);
        let after = Camera::new().with_orbit(50.0, 2.5, -0.7);

        // Fill the whole frame with the old view, then begin a second scan
        let mut r = renderer(120, 90);
        while r.is_active() {
            r.step(&before, 20);
        }
        r.start();
        r.step(&before, 20);
        r.step(&before, 20);
        assert_eq!(r.next_row(), 40);

        // Camera moved: restart and run to completion
        r.start();
        assert_eq!(r.next_row(), 0);
        while r.is_active() {
            r.step(&after, 20);
        }

        let expected = render(&after, r.scene(), r.config());
        let stale = render(&before, r.scene(), r.config());
        assert_ne!(expected, stale);
        assert_eq!(r.frame(), &expected);
    }
}
