//! Point cloud manager
//!
//! Routes inbound messages to one visualizer per upstream trackable, keeps
//! the visualization mode in sync across all of them and reports per-cloud
//! point counts.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::Settings;
use crate::core::{FrameUpdate, Message, TrackableId};
use crate::error::Result;
use crate::particles::{Mode, ParticleSink, PointCloudVisualizer};

/// Creates the rendering sink for a newly seen point cloud
pub type SinkFactory<S> = Box<dyn FnMut(&str) -> S>;

/// Aggregate counters since the manager was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerStats {
    /// Frames applied to a visualizer
    pub frames: u64,
    /// Frames dropped because their visualizer was disabled
    pub ignored_frames: u64,
    /// Observations received across all frames
    pub observations: u64,
    /// Point ids the upstream tracker reported as no longer tracked
    pub removed_reported: u64,
    /// Mode changes applied
    pub mode_changes: u64,
}

/// Owns every point cloud visualizer of a session
pub struct PointCloudManager<S> {
    clouds: HashMap<TrackableId, PointCloudVisualizer<S>>,
    settings: Settings,
    make_sink: SinkFactory<S>,
    stats: ManagerStats,
}

impl<S: ParticleSink> PointCloudManager<S> {
    pub fn new(settings: Settings, make_sink: impl FnMut(&str) -> S + 'static) -> Self {
        Self {
            clouds: HashMap::new(),
            settings,
            make_sink: Box::new(make_sink),
            stats: ManagerStats::default(),
        }
    }

    /// Apply one inbound message
    pub fn handle(&mut self, message: &Message) -> Result<()> {
        match message {
            Message::Frame(frame) => self.apply_frame(frame),
            Message::SetMode { mode } => self.set_mode(*mode),
            Message::ToggleMode => self.toggle_mode().map(|_| ()),
            Message::CloudRemoved { trackable_id } => {
                self.remove_cloud(trackable_id);
                Ok(())
            }
        }
    }

    /// Route a frame to its visualizer, creating it on first sight
    pub fn apply_frame(&mut self, frame: &FrameUpdate) -> Result<()> {
        let Settings { mode, style } = self.settings;
        let make_sink = &mut self.make_sink;
        let visualizer = self
            .clouds
            .entry(frame.trackable_id.clone())
            .or_insert_with(|| {
                debug!(trackable_id = %frame.trackable_id, ?mode, "New point cloud registered");
                PointCloudVisualizer::new(mode, style, make_sink(&frame.trackable_id))
            });

        self.stats.observations += frame.points.len() as u64;
        self.stats.removed_reported += frame.removed.len() as u64;
        match visualizer.apply_frame(frame)? {
            Some(_) => self.stats.frames += 1,
            None => self.stats.ignored_frames += 1,
        }
        Ok(())
    }

    /// Switch every point cloud (and clouds created later) to `mode`
    pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
        if mode != self.settings.mode {
            info!(mode = mode.label(), "Visualization mode set");
        }
        self.settings.mode = mode;
        self.stats.mode_changes += 1;
        for visualizer in self.clouds.values_mut() {
            visualizer.set_mode(mode)?;
        }
        Ok(())
    }

    /// Cycle to the next mode. Returns the new mode.
    pub fn toggle_mode(&mut self) -> Result<Mode> {
        let mode = self.settings.mode.next();
        self.set_mode(mode)?;
        Ok(mode)
    }

    /// Discard a point cloud together with its stored points
    pub fn remove_cloud(&mut self, trackable_id: &str) -> Option<PointCloudVisualizer<S>> {
        let removed = self.clouds.remove(trackable_id);
        if let Some(visualizer) = &removed {
            debug!(
                trackable_id,
                points = visualizer.total_point_count(),
                "Point cloud removed"
            );
        }
        removed
    }

    /// Enable or disable one point cloud. Returns false if it is unknown.
    pub fn set_enabled(&mut self, trackable_id: &str, enabled: bool) -> bool {
        match self.clouds.get_mut(trackable_id) {
            Some(visualizer) => {
                visualizer.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    /// One line per cloud, sorted by id, e.g. `"cloud-0: 42 total points"`
    pub fn status_lines(&self) -> Vec<String> {
        let mut ids: Vec<&TrackableId> = self.clouds.keys().collect();
        ids.sort();

        ids.into_iter()
            .map(|id| {
                let visualizer = &self.clouds[id];
                match self.settings.mode {
                    Mode::CurrentFrame => format!(
                        "{id}: {} points in current frame.",
                        visualizer.current_frame_point_count()
                    ),
                    Mode::All => format!("{id}: {} total points", visualizer.total_point_count()),
                }
            })
            .collect()
    }

    pub fn mode(&self) -> Mode {
        self.settings.mode
    }

    pub fn cloud(&self, trackable_id: &str) -> Option<&PointCloudVisualizer<S>> {
        self.clouds.get(trackable_id)
    }

    pub fn clouds(&self) -> impl Iterator<Item = (&str, &PointCloudVisualizer<S>)> {
        self.clouds.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn cloud_count(&self) -> usize {
        self.clouds.len()
    }

    /// Distinct points stored across every cloud
    pub fn total_point_count(&self) -> usize {
        self.clouds.values().map(|v| v.total_point_count()).sum()
    }

    /// Live particles submitted in the latest pass of every cloud
    pub fn active_particle_count(&self) -> usize {
        self.clouds.values().map(|v| v.last_stats().active).sum()
    }

    pub fn stats(&self) -> ManagerStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Observation, PointId};
    use crate::particles::MemorySink;

    fn manager(mode: Mode) -> PointCloudManager<MemorySink> {
        let settings = Settings { mode, ..Default::default() };
        PointCloudManager::new(settings, |_| MemorySink::new())
    }

    fn frame(cloud: &str, ids: &[PointId]) -> Message {
        Message::Frame(FrameUpdate::new(
            cloud,
            ids.iter().map(|&id| Observation::new(id, [id as f32; 3])).collect(),
        ))
    }

    #[test]
    fn test_clouds_are_independent() {
        let mut mgr = manager(Mode::All);
        mgr.handle(&frame("a", &[1, 2, 3])).unwrap();
        mgr.handle(&frame("b", &[1])).unwrap();

        assert_eq!(mgr.cloud_count(), 2);
        assert_eq!(mgr.cloud("a").unwrap().total_point_count(), 3);
        assert_eq!(mgr.cloud("b").unwrap().total_point_count(), 1);
        assert_eq!(mgr.total_point_count(), 4);
        assert_eq!(mgr.stats().frames, 2);
        assert_eq!(mgr.stats().observations, 4);
    }

    #[test]
    fn test_mode_applies_to_all_clouds() {
        let mut mgr = manager(Mode::All);
        mgr.handle(&frame("a", &[1, 2, 3])).unwrap();
        mgr.handle(&frame("a", &[4])).unwrap();
        mgr.handle(&frame("b", &[1, 2])).unwrap();
        assert_eq!(mgr.active_particle_count(), 6);

        mgr.handle(&Message::SetMode { mode: Mode::CurrentFrame }).unwrap();
        assert!(mgr.clouds().all(|(_, v)| v.mode() == Mode::CurrentFrame));
        assert_eq!(mgr.cloud("a").unwrap().sink().alive_count(), 1);
        assert_eq!(mgr.cloud("b").unwrap().sink().alive_count(), 2);

        // New clouds start in the current mode
        mgr.handle(&frame("c", &[1])).unwrap();
        assert_eq!(mgr.cloud("c").unwrap().mode(), Mode::CurrentFrame);
    }

    #[test]
    fn test_toggle_mode() {
        let mut mgr = manager(Mode::All);
        assert_eq!(mgr.toggle_mode().unwrap(), Mode::CurrentFrame);
        mgr.handle(&Message::ToggleMode).unwrap();
        assert_eq!(mgr.mode(), Mode::All);
        assert_eq!(mgr.stats().mode_changes, 2);
    }

    #[test]
    fn test_status_lines() {
        let mut mgr = manager(Mode::All);
        mgr.handle(&frame("b", &[1, 2, 3])).unwrap();
        mgr.handle(&frame("b", &[9])).unwrap();
        mgr.handle(&frame("a", &[1])).unwrap();

        assert_eq!(
            mgr.status_lines(),
            vec!["a: 1 total points".to_string(), "b: 4 total points".to_string()]
        );

        mgr.set_mode(Mode::CurrentFrame).unwrap();
        assert_eq!(
            mgr.status_lines(),
            vec![
                "a: 1 points in current frame.".to_string(),
                "b: 1 points in current frame.".to_string(),
            ]
        );
    }

    #[test]
    fn test_cloud_removed_discards_store() {
        let mut mgr = manager(Mode::All);
        mgr.handle(&frame("a", &[1, 2])).unwrap();
        mgr.handle(&Message::CloudRemoved { trackable_id: "a".into() }).unwrap();
        assert_eq!(mgr.cloud_count(), 0);

        // A restarted cloud starts empty
        mgr.handle(&frame("a", &[5])).unwrap();
        assert_eq!(mgr.cloud("a").unwrap().total_point_count(), 1);
    }

    #[test]
    fn test_disabled_cloud_counts_ignored_frames() {
        let mut mgr = manager(Mode::All);
        mgr.handle(&frame("a", &[1])).unwrap();
        assert!(mgr.set_enabled("a", false));
        assert!(!mgr.set_enabled("missing", false));

        mgr.handle(&frame("a", &[2])).unwrap();
        assert_eq!(mgr.stats().ignored_frames, 1);
        assert_eq!(mgr.cloud("a").unwrap().total_point_count(), 1);
        assert!(!mgr.cloud("a").unwrap().sink().is_visible());
    }

    #[test]
    fn test_sink_factory_receives_id() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let mut mgr = PointCloudManager::new(Settings::default(), move |id: &str| {
            seen_clone.borrow_mut().push(id.to_string());
            MemorySink::new()
        });

        mgr.handle(&frame("x", &[1])).unwrap();
        mgr.handle(&frame("x", &[2])).unwrap();
        mgr.handle(&frame("y", &[1])).unwrap();
        assert_eq!(*seen.borrow(), vec!["x".to_string(), "y".to_string()]);
    }
}
