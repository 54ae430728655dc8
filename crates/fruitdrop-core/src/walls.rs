//! Static walls bounding the bin.

use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::physics::PhysicsWorld;
use crate::tag::{BodyTag, WallKind};

/// Axis-aligned wall rectangle, center and half extents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WallRect {
    pub kind: WallKind,
    pub center: [f32; 2],
    pub half_extents: [f32; 2],
}

impl WallRect {
    /// Computes the three walls for the configured bin.
    pub fn layout(config: &GameConfig) -> [WallRect; 3] {
        let t = config.wall_thickness;
        let side_center_y = config.bin_bottom - config.wall_height / 2.0;
        let side_half = [t / 2.0, config.wall_height / 2.0];

        WallKind::ALL.map(|kind| match kind {
            WallKind::Floor => WallRect {
                kind,
                center: [config.bin_center_x(), config.bin_bottom + t / 2.0],
                half_extents: [config.bin_width() / 2.0 + t, t / 2.0],
            },
            WallKind::Left => WallRect {
                kind,
                center: [config.bin_left - t / 2.0, side_center_y],
                half_extents: side_half,
            },
            WallKind::Right => WallRect {
                kind,
                center: [config.bin_right + t / 2.0, side_center_y],
                half_extents: side_half,
            },
        })
    }
}

/// Inserts the floor and both side walls as fixed bodies.
pub fn build_walls(world: &mut PhysicsWorld, config: &GameConfig) -> Vec<RigidBodyHandle> {
    WallRect::layout(config)
        .into_iter()
        .map(|rect| {
            let body = RigidBodyBuilder::fixed()
                .translation(Vector::new(rect.center[0], rect.center[1]))
                .user_data(BodyTag::Wall(rect.kind).encode())
                .build();
            let handle = world.add_rigid_body(body);
            let collider = ColliderBuilder::cuboid(rect.half_extents[0], rect.half_extents[1])
                .friction(config.fruit_material.friction)
                .build();
            world.add_collider(collider, handle);
            handle
        })
        .collect()
}

/// Number of wall bodies currently in the world.
pub fn wall_count(world: &PhysicsWorld) -> usize {
    world
        .tagged_bodies()
        .filter(|(_, _, tag)| matches!(tag, BodyTag::Wall(_)))
        .count()
}
