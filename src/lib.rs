pub mod config;
pub mod elevation;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod graph;
pub mod islands;
pub mod noise;
pub mod rivers;
pub mod shape;
pub mod water;

pub use config::MapGenerationParams;
pub use elevation::ElevationCurve;
pub use error::{ConfigError, GraphError, MapError};
pub use generator::{IslandMap, MapGenerator, MapStats};
pub use geometry::{Bounds, DelaunayAdapter, GeometryAdapter, VoronoiEdgeInput, VoronoiInput};
pub use graph::{Cell, CellId, Corner, CornerId, Edge, EdgeId, Graph, MapPoint};
pub use shape::IslandShape;
