use cgmath::{InnerSpace, Matrix3, Quaternion, Vector3, vec3};
use engine::event_log;

use crate::effect::Effect;

/// Sound played when a coin is collected
pub const COIN_PICKUP_SOUND: &str = "coin_pickup";

/// Height the task panel looks toward when its trigger sits above the origin
const RAISED_TASK_LOOK_HEIGHT: f32 = 12.0;

/// Tags recognised on trigger volumes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriggerTag {
    Banner,
    ObjectInteractionTask,
    Coin,
    Other(String),
}

impl TriggerTag {
    pub fn parse(tag: &str) -> TriggerTag {
        match tag {
            "banner" => TriggerTag::Banner,
            "objectInteractionTask" => TriggerTag::ObjectInteractionTask,
            "coin" => TriggerTag::Coin,
            other => TriggerTag::Other(other.to_owned()),
        }
    }
}

/// The trigger volume the player just entered
#[derive(Clone, Debug)]
pub struct TriggerVolume {
    pub tag: TriggerTag,
    /// Scene object name; banners use it as the stage name
    pub name: String,
    pub position: Vector3<f32>,
}

impl TriggerVolume {
    pub fn new(tag: &str, name: impl Into<String>, position: Vector3<f32>) -> TriggerVolume {
        TriggerVolume {
            tag: TriggerTag::parse(tag),
            name: name.into(),
            position,
        }
    }
}

/// Parkour course bookkeeping shared with the rest of the game
#[derive(Clone, Debug, PartialEq)]
pub struct ParkourCounter {
    /// A run is in progress; respawn is only allowed during a run
    pub run_active: bool,
    pub respawn_position: Vector3<f32>,
    pub stage_changed: bool,
    pub coin_count: u32,
}

impl Default for ParkourCounter {
    fn default() -> Self {
        ParkourCounter {
            run_active: false,
            respawn_position: vec3(0.0, 0.0, 0.0),
            stage_changed: false,
            coin_count: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            position: vec3(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
        }
    }
}

/// Object-selection task measurement
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionTaskMeasure {
    pub is_task_start: bool,
    pub score_text: String,
    pub part_sum_err: f32,
    pub part_sum_time: f32,
    pub task_ui: Transform,
    pub task_start_panel_active: bool,
}

/// Optional game objects the reactor updates. Missing ones are skipped.
#[derive(Default)]
pub struct Collaborators<'a> {
    pub parkour: Option<&'a mut ParkourCounter>,
    pub task: Option<&'a mut SelectionTaskMeasure>,
}

#[derive(Clone, Debug, Default)]
pub struct EventReactor {
    stage: Option<String>,
}

impl EventReactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the last banner passed
    pub fn current_stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    /// Handle the player entering `volume`. `viewer_position` is the headset's
    /// world position, used to turn the task panel toward the player.
    pub fn on_trigger_enter(
        &mut self,
        volume: &TriggerVolume,
        viewer_position: Option<Vector3<f32>>,
        collaborators: &mut Collaborators<'_>,
    ) -> Vec<Effect> {
        match &volume.tag {
            TriggerTag::Banner => {
                event_log!(INFO, "entered stage {}", volume.name);
                self.stage = Some(volume.name.clone());
                if let Some(parkour) = collaborators.parkour.as_deref_mut() {
                    parkour.stage_changed = true;
                }
                Vec::new()
            }
            TriggerTag::ObjectInteractionTask => {
                if let Some(task) = collaborators.task.as_deref_mut() {
                    start_task(task, volume, viewer_position);
                }
                Vec::new()
            }
            TriggerTag::Coin => {
                if let Some(parkour) = collaborators.parkour.as_deref_mut() {
                    parkour.coin_count += 1;
                    event_log!(DEBUG, "coin {} collected ({})", volume.name, parkour.coin_count);
                }
                vec![
                    Effect::PlaySound {
                        name: COIN_PICKUP_SOUND.to_owned(),
                    },
                    Effect::DeactivateEntity {
                        name: volume.name.clone(),
                    },
                ]
            }
            TriggerTag::Other(tag) => {
                event_log!(TRACE, "ignoring trigger {} tagged '{}'", volume.name, tag);
                Vec::new()
            }
        }
    }
}

fn start_task(
    task: &mut SelectionTaskMeasure,
    volume: &TriggerVolume,
    viewer_position: Option<Vector3<f32>>,
) {
    task.is_task_start = true;
    task.score_text.clear();
    task.part_sum_err = 0.0;
    task.part_sum_time = 0.0;

    if let Some(viewer) = viewer_position {
        let look_height = if volume.position.y > 0.0 {
            RAISED_TASK_LOOK_HEIGHT
        } else {
            0.0
        };
        let target = vec3(viewer.x, look_height, viewer.z);
        if let Some(rotation) = face_towards(task.task_ui.position, target) {
            task.task_ui.rotation = rotation;
        }
    }

    task.task_start_panel_active = true;
    event_log!(INFO, "task started at {}", volume.name);
}

/// Rotation whose +Z points from `from` at `target`, so the panel's forward
/// (-Z) faces away from it, with +Y kept as close to world up as possible.
/// `None` when the direction is degenerate.
fn face_towards(from: Vector3<f32>, target: Vector3<f32>) -> Option<Quaternion<f32>> {
    let to_target = target - from;
    if to_target.magnitude2() < 1e-8 {
        return None;
    }

    // +Z along the look direction
    let z = to_target.normalize();
    let x = vec3(0.0, 1.0, 0.0).cross(z);
    if x.magnitude2() < 1e-8 {
        return None;
    }
    let x = x.normalize();
    let y = z.cross(x);

    Some(Quaternion::from(Matrix3::from_cols(x, y, z)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Rotation;

    #[test]
    fn test_banner_records_stage() {
        let mut reactor = EventReactor::new();
        let mut parkour = ParkourCounter::default();
        let mut collaborators = Collaborators {
            parkour: Some(&mut parkour),
            task: None,
        };

        let effects = reactor.on_trigger_enter(
            &TriggerVolume::new("banner", "Stage2", vec3(0.0, 0.0, 0.0)),
            None,
            &mut collaborators,
        );

        assert!(effects.is_empty());
        assert_eq!(reactor.current_stage(), Some("Stage2"));
        assert!(parkour.stage_changed);
    }

    #[test]
    fn test_banner_without_counter_still_records_stage() {
        let mut reactor = EventReactor::new();
        reactor.on_trigger_enter(
            &TriggerVolume::new("banner", "Stage1", vec3(0.0, 0.0, 0.0)),
            None,
            &mut Collaborators::default(),
        );
        assert_eq!(reactor.current_stage(), Some("Stage1"));
    }

    #[test]
    fn test_coin_pickup() {
        let mut reactor = EventReactor::new();
        let mut parkour = ParkourCounter {
            coin_count: 4,
            ..ParkourCounter::default()
        };

        let effects = reactor.on_trigger_enter(
            &TriggerVolume::new("coin", "Coin (17)", vec3(1.0, 1.0, 1.0)),
            None,
            &mut Collaborators {
                parkour: Some(&mut parkour),
                task: None,
            },
        );

        assert_eq!(parkour.coin_count, 5);
        assert_eq!(
            effects,
            vec![
                Effect::PlaySound {
                    name: COIN_PICKUP_SOUND.to_owned()
                },
                Effect::DeactivateEntity {
                    name: "Coin (17)".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_task_start_resets_measurement() {
        let mut reactor = EventReactor::new();
        let mut task = SelectionTaskMeasure {
            score_text: "Score: 12".to_owned(),
            part_sum_err: 3.5,
            part_sum_time: 40.0,
            task_ui: Transform {
                position: vec3(0.0, 0.0, 0.0),
                ..Transform::default()
            },
            ..SelectionTaskMeasure::default()
        };

        reactor.on_trigger_enter(
            &TriggerVolume::new("objectInteractionTask", "Task", vec3(0.0, -1.0, 0.0)),
            Some(vec3(0.0, 1.7, -5.0)),
            &mut Collaborators {
                parkour: None,
                task: Some(&mut task),
            },
        );

        assert!(task.is_task_start);
        assert!(task.score_text.is_empty());
        assert_eq!(task.part_sum_err, 0.0);
        assert_eq!(task.part_sum_time, 0.0);
        assert!(task.task_start_panel_active);

        // Trigger below the origin: the panel's back turns to the viewer at
        // height 0, its forward points away
        let rotation = task.task_ui.rotation;
        let forward = rotation.rotate_vector(vec3(0.0, 0.0, -1.0));
        assert!((forward - vec3(0.0, 0.0, 1.0)).magnitude() < 1e-4);
        assert!(forward.dot(vec3(0.0, 1.7, -5.0)) < 0.0);
        let back = rotation.rotate_vector(vec3(0.0, 0.0, 1.0));
        assert!((back - vec3(0.0, 0.0, -1.0)).magnitude() < 1e-4);
    }

    #[test]
    fn test_raised_task_panel_uses_raised_look_height() {
        let mut task = SelectionTaskMeasure {
            task_ui: Transform {
                position: vec3(0.0, 10.0, 0.0),
                ..Transform::default()
            },
            ..SelectionTaskMeasure::default()
        };

        EventReactor::new().on_trigger_enter(
            &TriggerVolume::new("objectInteractionTask", "Task", vec3(0.0, 8.0, 0.0)),
            Some(vec3(2.0, 9.5, 0.0)),
            &mut Collaborators {
                parkour: None,
                task: Some(&mut task),
            },
        );

        let forward = task.task_ui.rotation.rotate_vector(vec3(0.0, 0.0, -1.0));
        let expected = -vec3(2.0, 2.0, 0.0).normalize();
        assert!((forward - expected).magnitude() < 1e-4);
    }

    #[test]
    fn test_task_without_viewer_keeps_orientation() {
        let mut task = SelectionTaskMeasure::default();
        EventReactor::new().on_trigger_enter(
            &TriggerVolume::new("objectInteractionTask", "Task", vec3(0.0, 1.0, 0.0)),
            None,
            &mut Collaborators {
                parkour: None,
                task: Some(&mut task),
            },
        );
        assert!(task.task_start_panel_active);
        assert_eq!(task.task_ui.rotation, Transform::default().rotation);
    }

    #[test]
    fn test_unknown_tag_is_ignored() {
        let mut reactor = EventReactor::new();
        let mut parkour = ParkourCounter::default();
        let effects = reactor.on_trigger_enter(
            &TriggerVolume::new("Respawn", "Checkpoint", vec3(0.0, 0.0, 0.0)),
            None,
            &mut Collaborators {
                parkour: Some(&mut parkour),
                task: None,
            },
        );
        assert!(effects.is_empty());
        assert_eq!(parkour, ParkourCounter::default());
        assert_eq!(reactor.current_stage(), None);
    }
}
