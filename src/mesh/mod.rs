// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh collaborators: triangulation, BSP corefinement and solid queries

pub mod csg;
mod solid;
mod triangulate;

pub use csg::Keep;
pub use solid::split_segment;
pub use triangulate::{
    to_geo_polygon, triangulate_in_frame, triangulate_polygon_2d, triangulate_polygon_3d,
};
