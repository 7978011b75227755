//! Demo configuration.

/// Parameters of the procedural scene the demo builds.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Edge length of the square input grid.
    pub size: f32,
    /// Vertices along each side of the grid.
    pub resolution: u32,
    /// Height of the bump raised in the middle of the grid.
    pub displacement: f32,
    /// Radius of scattered points.
    pub point_radius: f32,
    /// Upper bound on the number of instances placed on the points.
    pub max_instances: usize,
}

impl DemoConfig {
    /// Create a config for a grid with `resolution` vertices per side.
    #[must_use]
    pub fn new(resolution: u32) -> Self {
        Self {
            size: 2.0,
            resolution,
            displacement: 0.5,
            point_radius: 0.05,
            max_instances: 16,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_displacement(mut self, displacement: f32) -> Self {
        self.displacement = displacement;
        self
    }

    #[must_use]
    pub fn with_point_radius(mut self, radius: f32) -> Self {
        self.point_radius = radius;
        self
    }

    #[must_use]
    pub fn with_max_instances(mut self, max_instances: usize) -> Self {
        self.max_instances = max_instances;
        self
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::new(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = DemoConfig::new(4)
            .with_size(10.0)
            .with_displacement(1.0)
            .with_point_radius(0.2)
            .with_max_instances(3);
        assert_eq!(config.resolution, 4);
        assert_eq!(config.size, 10.0);
        assert_eq!(config.displacement, 1.0);
        assert_eq!(config.point_radius, 0.2);
        assert_eq!(config.max_instances, 3);
    }

    #[test]
    fn test_default() {
        assert_eq!(DemoConfig::default().resolution, 8);
    }
}
