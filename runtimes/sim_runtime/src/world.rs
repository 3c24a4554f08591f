use cgmath::{Vector3, vec3};
use locomotion::{RapierBody, TriggerVolume};
use rapier3d::prelude::*;

/// Player capsule: 1.8 m tall, feet at the body origin
const PLAYER_RADIUS: f32 = 0.3;
const PLAYER_HALF_HEIGHT: f32 = 0.6;
const PLAYER_CENTER_HEIGHT: f32 = PLAYER_HALF_HEIGHT + PLAYER_RADIUS;

/// Half extent of the (cubic) trigger volumes
const TRIGGER_HALF_EXTENT: f32 = 1.0;

/// A trigger volume in the course, with the host-side state the controller
/// cannot see (whether it is still active and whether the player is inside)
pub struct CourseVolume {
    pub volume: TriggerVolume,
    pub active: bool,
    inside: bool,
}

impl CourseVolume {
    fn new(tag: &str, name: &str, position: Vector3<f32>) -> CourseVolume {
        CourseVolume {
            volume: TriggerVolume::new(tag, name, position),
            active: true,
            inside: false,
        }
    }

    fn contains(&self, point: Vector3<f32>) -> bool {
        let d = point - self.volume.position;
        d.x.abs() <= TRIGGER_HALF_EXTENT
            && d.y.abs() <= TRIGGER_HALF_EXTENT
            && d.z.abs() <= TRIGGER_HALF_EXTENT
    }
}

/// Straight parkour course along -Z: a banner per stage, coins between them
/// and a task zone at the end
pub fn default_course() -> Vec<CourseVolume> {
    let mut course = Vec::new();
    for stage in 0..3 {
        let start = -20.0 * stage as f32;
        course.push(CourseVolume::new(
            "banner",
            &format!("Stage{}", stage + 1),
            vec3(0.0, 1.0, start - 2.0),
        ));
        for coin in 0..4 {
            course.push(CourseVolume::new(
                "coin",
                &format!("Coin{}-{}", stage + 1, coin + 1),
                vec3(0.0, 1.0, start - 5.0 - 3.0 * coin as f32),
            ));
        }
    }
    course.push(CourseVolume::new(
        "objectInteractionTask",
        "SelectionTask",
        vec3(0.0, 0.0, -62.0),
    ));
    course
}

/// Volumes the player centre has just entered
pub fn entered_volumes(course: &mut [CourseVolume], player_position: Vector3<f32>) -> Vec<usize> {
    let center = player_position + vec3(0.0, PLAYER_CENTER_HEIGHT, 0.0);
    let mut entered = Vec::new();
    for (index, course_volume) in course.iter_mut().enumerate() {
        let inside = course_volume.active && course_volume.contains(center);
        if inside && !course_volume.inside {
            entered.push(index);
        }
        course_volume.inside = inside;
    }
    entered
}

/// rapier3d world with a ground plane and the player capsule
pub struct SimWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    gravity: Vector<Real>,
    player: RigidBodyHandle,
}

impl SimWorld {
    pub fn new(physics_dt: f32, spawn: Vector3<f32>) -> SimWorld {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        let ground = ColliderBuilder::cuboid(200.0, 0.1, 200.0)
            .translation(vector![0.0, -0.1, 0.0])
            .friction(0.0)
            .build();
        colliders.insert(ground);

        let player = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(vector![spawn.x, spawn.y, spawn.z])
                .build(),
        );
        let capsule = ColliderBuilder::capsule_y(PLAYER_HALF_HEIGHT, PLAYER_RADIUS)
            .translation(vector![0.0, PLAYER_CENTER_HEIGHT, 0.0])
            .friction(0.0)
            .build();
        colliders.insert_with_parent(capsule, player, &mut bodies);

        let integration_parameters = IntegrationParameters {
            dt: physics_dt,
            ..IntegrationParameters::default()
        };

        SimWorld {
            bodies,
            colliders,
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            gravity: vector![0.0, -9.81, 0.0],
            player,
        }
    }

    pub fn player_body(&mut self) -> RapierBody<'_> {
        RapierBody::new(&mut self.bodies, self.player)
    }

    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_entry_fires_once() {
        let mut course = vec![CourseVolume::new("coin", "Coin", vec3(0.0, 1.0, -5.0))];

        assert!(entered_volumes(&mut course, vec3(0.0, 0.0, 0.0)).is_empty());
        assert_eq!(entered_volumes(&mut course, vec3(0.0, 0.0, -5.0)), vec![0]);
        assert!(entered_volumes(&mut course, vec3(0.0, 0.0, -5.2)).is_empty());
    }

    #[test]
    fn test_inactive_volume_never_fires() {
        let mut course = vec![CourseVolume::new("coin", "Coin", vec3(0.0, 1.0, -5.0))];
        course[0].active = false;
        assert!(entered_volumes(&mut course, vec3(0.0, 0.0, -5.0)).is_empty());
    }

    #[test]
    fn test_course_ends_with_task() {
        let course = default_course();
        assert_eq!(course.len(), 16);
        assert_eq!(
            course.last().map(|v| v.volume.name.as_str()),
            Some("SelectionTask")
        );
    }
}
