//! Road segment pool
//!
//! A fixed ring of segment groups gives the illusion of an endless road:
//! whenever a group falls far enough behind the camera it is moved in front
//! of the current front-most group and gets a freshly rolled obstacle.

use glam::Mat4;
use rand::Rng;

use super::spawner::spawn_obstacle;
use crate::assets::ModelLibrary;
use crate::scene::{Aabb, NodeId, NodeIds, SceneNode};

/// Fixed-size ring of road segment groups
#[derive(Debug, Clone)]
pub struct SegmentPool {
    /// One group per segment; never grows or shrinks
    groups: Vec<SceneNode>,
    /// Obstacle id per group index (a back-reference into that group's children)
    obstacles: Vec<Option<NodeId>>,
    segment_length: f32,
    lane_width: f32,
    /// Groups further than this behind the camera get recycled
    recycle_distance: f32,
}

impl SegmentPool {
    /// Wrap already-populated groups.
    ///
    /// `obstacles[i]` must name a direct child of `groups[i]` (or be `None`).
    pub fn new(
        groups: Vec<SceneNode>,
        obstacles: Vec<Option<NodeId>>,
        segment_length: f32,
        lane_width: f32,
        recycle_distance: f32,
    ) -> Self {
        debug_assert_eq!(groups.len(), obstacles.len());
        Self {
            groups,
            obstacles,
            segment_length,
            lane_width,
            recycle_distance,
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn segment_length(&self) -> f32 {
        self.segment_length
    }

    pub fn lane_width(&self) -> f32 {
        self.lane_width
    }

    pub fn recycle_distance(&self) -> f32 {
        self.recycle_distance
    }

    pub fn groups(&self) -> &[SceneNode] {
        &self.groups
    }

    pub fn obstacle_ids(&self) -> &[Option<NodeId>] {
        &self.obstacles
    }

    /// Longitudinal position of each group, by index
    pub fn positions(&self) -> Vec<f32> {
        self.groups.iter().map(|g| g.transform.translation.z).collect()
    }

    /// Position of the front-most group (most negative z)
    pub fn front_z(&self) -> f32 {
        self.groups
            .iter()
            .map(|g| g.transform.translation.z)
            .fold(f32::INFINITY, f32::min)
    }

    /// Live obstacle nodes with the transform of the group that owns them
    pub fn obstacles(&self) -> impl Iterator<Item = (&SceneNode, Mat4)> + '_ {
        self.groups
            .iter()
            .zip(&self.obstacles)
            .filter_map(|(group, slot)| {
                let node = group.child((*slot)?)?;
                Some((node, group.transform.matrix()))
            })
    }

    /// Live obstacles with their world-space bounds
    pub fn obstacle_bounds(&self) -> impl Iterator<Item = (NodeId, Aabb)> + '_ {
        self.obstacles()
            .map(|(node, group)| (node.id, node.world_bounds(&group)))
    }

    /// Detach the obstacle of group `index`, if it has one
    pub fn clear_obstacle(&mut self, index: usize) -> Option<SceneNode> {
        let id = self.obstacles.get_mut(index)?.take()?;
        self.groups[index].remove(id)
    }

    /// Put `obstacle` into group `index` (group-local coordinates),
    /// replacing whatever was there
    pub fn set_obstacle(&mut self, index: usize, obstacle: SceneNode) -> Option<NodeId> {
        if index >= self.groups.len() {
            return None;
        }
        self.clear_obstacle(index);
        let id = self.groups[index].add(obstacle);
        self.obstacles[index] = Some(id);
        Some(id)
    }

    /// Move every group that has fallen behind the camera to the front of
    /// the road and reroll its obstacle. Returns how many groups moved.
    pub fn recycle<R: Rng + ?Sized>(
        &mut self,
        camera_z: f32,
        library: &ModelLibrary,
        ids: &mut NodeIds,
        rng: &mut R,
    ) -> usize {
        let mut moved = 0;
        for i in 0..self.groups.len() {
            if self.groups[i].transform.translation.z - camera_z <= self.recycle_distance {
                continue;
            }

            let new_z = self.front_z() - self.segment_length;
            let group = &mut self.groups[i];
            let old_z = group.transform.translation.z;
            group.transform.translation.z = new_z;

            if let Some(old) = self.obstacles[i].take() {
                group.remove(old);
            }
            self.obstacles[i] = spawn_obstacle(0.0, self.lane_width, group, library, ids, rng);

            log::debug!(
                "recycled segment {} from z {:.2} to {:.2} (obstacle: {})",
                i,
                old_z,
                new_z,
                self.obstacles[i].is_some()
            );
            moved += 1;
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Transform;
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Bare pool: empty groups tiled from z = 0 forward
    fn bare_pool(n: usize, length: f32, recycle_distance: f32) -> (SegmentPool, NodeIds) {
        let mut ids = NodeIds::new();
        let groups = (0..n)
            .map(|i| {
                SceneNode::group(&mut ids, format!("segment_{i}"))
                    .with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, -(i as f32) * length)))
            })
            .collect();
        (
            SegmentPool::new(groups, vec![None; n], length, 12.0, recycle_distance),
            ids,
        )
    }

    fn assert_tiled(pool: &SegmentPool) {
        let mut z = pool.positions();
        z.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in z.windows(2) {
            assert!(((pair[1] - pair[0]) - pool.segment_length()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_nothing_moves_near_camera() {
        let (mut pool, mut ids) = bare_pool(5, 10.0, 10.0);
        let lib = ModelLibrary::placeholder(&mut ids);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(pool.recycle(0.0, &lib, &mut ids, &mut rng), 0);
        assert_eq!(pool.positions(), vec![0.0, -10.0, -20.0, -30.0, -40.0]);
    }

    #[test]
    fn test_group_behind_camera_moves_to_front() {
        let (mut pool, mut ids) = bare_pool(5, 10.0, 10.0);
        let lib = ModelLibrary::placeholder(&mut ids);
        let mut rng = Pcg32::seed_from_u64(1);

        // Camera 15 ahead of the rear group: only that one is > 10 behind
        assert_eq!(pool.recycle(-15.0, &lib, &mut ids, &mut rng), 1);
        assert_eq!(pool.positions()[0], -50.0);
        assert_eq!(pool.front_z(), -50.0);
        assert_tiled(&pool);

        // Same camera position again: nothing left to do
        assert_eq!(pool.recycle(-15.0, &lib, &mut ids, &mut rng), 0);
    }

    #[test]
    fn test_big_jump_recycles_several_and_keeps_tiling() {
        let (mut pool, mut ids) = bare_pool(6, 4.0, 4.0);
        let lib = ModelLibrary::placeholder(&mut ids);
        let mut rng = Pcg32::seed_from_u64(3);

        let moved = pool.recycle(-13.0, &lib, &mut ids, &mut rng);
        assert_eq!(moved, 3);
        assert_tiled(&pool);
        assert_eq!(pool.len(), 6);
    }

    #[test]
    fn test_obstacle_slot_replaced_on_recycle() {
        let (mut pool, mut ids) = bare_pool(3, 10.0, 10.0);
        let lib = ModelLibrary::placeholder(&mut ids);
        let mut rng = Pcg32::seed_from_u64(11);

        let mut camera_z = 0.0;
        for _ in 0..200 {
            camera_z -= 10.0;
            pool.recycle(camera_z, &lib, &mut ids, &mut rng);
            for (group, slot) in pool.groups().iter().zip(pool.obstacle_ids()) {
                let obstacles = group
                    .children
                    .iter()
                    .filter(|c| c.name == super::super::spawner::OBSTACLE_NAME)
                    .count();
                assert!(obstacles <= 1);
                assert_eq!(obstacles, usize::from(slot.is_some()));
                if let Some(id) = slot {
                    assert!(group.child(*id).is_some());
                }
            }
        }
        assert_tiled(&pool);
        assert!(pool.obstacle_bounds().count() <= 3);
    }

    #[test]
    fn test_set_and_clear_obstacle() {
        let (mut pool, mut ids) = bare_pool(2, 10.0, 10.0);
        let block = SceneNode::group(&mut ids, "block");
        let id = pool.set_obstacle(1, block).unwrap();
        assert_eq!(pool.obstacle_ids(), &[None, Some(id)]);
        assert!(pool.set_obstacle(5, SceneNode::group(&mut ids, "x")).is_none());

        let removed = pool.clear_obstacle(1).unwrap();
        assert_eq!(removed.id, id);
        assert!(pool.groups()[1].children.is_empty());
        assert!(pool.clear_obstacle(1).is_none());
    }
}
