//! A*-based navigation over a waypoint graph derived from the map's
//! traversable terrain plus dynamic tower obstacles (SPEC_FULL.md §4.1).

mod graph;
mod path_graph;
mod path_planner;

pub use path_planner::PathPlanner;
