//! Configuration types for the terminal debugger.

use std::collections::BTreeSet;
use std::time::Duration;
use vdebug_replay::{AutoPlay, DEFAULT_STEP_DELAY};
use vdebug_types::{compute_positions, LayoutError, NodeLayout, NodePosition, Viewport};

/// Configuration for a debugging session.
#[derive(Clone, Debug)]
pub struct DebuggerConfig {
    /// Delay between two auto-play steps.
    pub step_delay: Duration,

    /// Drawing area node positions are computed for.
    pub viewport: Viewport,

    /// How nodes are arranged in the viewport.
    pub layout: NodeLayout,
}

impl DebuggerConfig {
    /// Create a configuration with the default step delay, viewport and layout.
    pub fn new() -> Self {
        Self {
            step_delay: DEFAULT_STEP_DELAY,
            viewport: Viewport::default(),
            layout: NodeLayout::default(),
        }
    }

    /// Set the auto-play step delay.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Set the viewport.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set the node layout.
    pub fn with_layout(mut self, layout: NodeLayout) -> Self {
        self.layout = layout;
        self
    }

    /// A stopped auto-play ticking at the configured delay.
    pub fn autoplay(&self) -> AutoPlay {
        AutoPlay::new(self.step_delay)
    }

    /// Node icon positions for this viewport and layout.
    pub fn positions(&self, node_ids: &BTreeSet<String>) -> Result<Vec<NodePosition>, LayoutError> {
        compute_positions(node_ids, self.layout, self.viewport)
    }
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DebuggerConfig::default();
        assert_eq!(config.step_delay, Duration::from_millis(200));
        assert_eq!(config.layout, NodeLayout::Circle);
        assert_eq!(config.autoplay().period(), config.step_delay);
    }

    #[test]
    fn test_builder() {
        let config = DebuggerConfig::new()
            .with_step_delay(Duration::from_millis(50))
            .with_viewport(Viewport::new(800, 800))
            .with_layout(NodeLayout::Row);

        assert_eq!(config.autoplay().period(), Duration::from_millis(50));
        assert_eq!(config.viewport, Viewport::new(800, 800));

        let nodes: BTreeSet<String> = ["1".to_string()].into_iter().collect();
        assert_eq!(
            config.positions(&nodes),
            Err(LayoutError::Unsupported(NodeLayout::Row))
        );
    }

    #[test]
    fn test_circle_positions() {
        let config = DebuggerConfig::new().with_viewport(Viewport::new(800, 800));
        let nodes: BTreeSet<String> = ["1", "2", "3", "4"].iter().map(|s| s.to_string()).collect();

        let positions = config.positions(&nodes).unwrap();
        assert_eq!(positions.len(), 4);
        assert_eq!(positions[0].node_id, "1");
        assert!((positions[0].x - 400.0).abs() < 1e-9);
        assert!((positions[0].y - 50.0).abs() < 1e-9);
    }
}
