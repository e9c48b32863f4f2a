//! Range clamping for authored character tuning.
//!
//! Out-of-range values are pulled back into their valid domain rather than
//! rejected; each adjustment is reported so the caller can log it.

use super::data::*;

/// A single clamped field with its authored and applied values.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub field: &'static str,
    pub authored: f32,
    pub applied: f32,
}

impl std::fmt::Display for Adjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' out of range: {} clamped to {}",
            self.field, self.authored, self.applied
        )
    }
}

/// Clamp a float field into [min, max], recording the change.
macro_rules! clamp_field {
    ($adjustments:expr, $value:expr, $field:expr, $min:expr, $max:expr) => {
        let authored = $value;
        let applied = if authored.is_nan() {
            $min
        } else {
            authored.clamp($min, $max)
        };
        if applied != authored {
            $adjustments.push(Adjustment {
                field: $field,
                authored,
                applied,
            });
            $value = applied;
        }
    };
}

impl CharacterTuning {
    /// Returns a copy with every field inside its valid domain, plus the
    /// list of adjustments that were made.
    pub fn sanitized(&self) -> (CharacterTuning, Vec<Adjustment>) {
        let mut t = self.clone();
        let mut adjustments = Vec::new();

        // Body
        clamp_field!(adjustments, t.body.mass, "body.mass", 0.001, f32::MAX);
        clamp_field!(
            adjustments,
            t.body.world_gravity,
            "body.world_gravity",
            f32::MIN,
            -0.001
        );
        clamp_field!(adjustments, t.body.size[0], "body.size.x", 0.01, f32::MAX);
        clamp_field!(adjustments, t.body.size[1], "body.size.y", 0.01, f32::MAX);
        clamp_field!(
            adjustments,
            t.body.ground_probe_distance,
            "body.ground_probe_distance",
            0.0,
            f32::MAX
        );
        clamp_field!(adjustments, t.body.tip_radius, "body.tip_radius", 0.01, f32::MAX);

        // Jump
        clamp_field!(adjustments, t.jump.jump_height, "jump.jump_height", 0.0, f32::MAX);
        clamp_field!(adjustments, t.jump.time_to_apex, "jump.time_to_apex", 0.2, 1.25);
        clamp_field!(
            adjustments,
            t.jump.upward_multiplier,
            "jump.upward_multiplier",
            0.0,
            5.0
        );
        clamp_field!(
            adjustments,
            t.jump.downward_multiplier,
            "jump.downward_multiplier",
            1.0,
            10.0
        );
        clamp_field!(adjustments, t.jump.jump_cut_off, "jump.jump_cut_off", 1.0, 10.0);
        clamp_field!(adjustments, t.jump.coyote_time, "jump.coyote_time", 0.0, 0.3);
        clamp_field!(adjustments, t.jump.jump_buffer, "jump.jump_buffer", 0.0, 0.3);
        clamp_field!(
            adjustments,
            t.jump.coyote_floor,
            "jump.coyote_floor",
            0.0,
            t.jump.coyote_time
        );
        clamp_field!(
            adjustments,
            t.jump.boost_jump_block_time,
            "jump.boost_jump_block_time",
            0.0,
            f32::MAX
        );

        // Umbrella
        clamp_field!(
            adjustments,
            t.umbrella.activation_delay,
            "umbrella.activation_delay",
            0.0,
            f32::MAX
        );
        clamp_field!(
            adjustments,
            t.umbrella.glide_gravity_multiplier,
            "umbrella.glide_gravity_multiplier",
            0.0,
            f32::MAX
        );
        clamp_field!(
            adjustments,
            t.umbrella.dash_wind_up,
            "umbrella.dash_wind_up",
            0.0,
            f32::MAX
        );
        clamp_field!(
            adjustments,
            t.umbrella.dash_duration,
            "umbrella.dash_duration",
            0.0,
            f32::MAX
        );
        clamp_field!(
            adjustments,
            t.umbrella.boost_jump_multiplier,
            "umbrella.boost_jump_multiplier",
            0.0,
            f32::MAX
        );
        clamp_field!(
            adjustments,
            t.umbrella.super_jump_multiplier,
            "umbrella.super_jump_multiplier",
            0.0,
            f32::MAX
        );

        // Swing
        clamp_field!(
            adjustments,
            t.swing.max_probe_distance,
            "swing.max_probe_distance",
            0.0,
            f32::MAX
        );
        clamp_field!(adjustments, t.swing.probe_radius, "swing.probe_radius", 0.01, 1.0);
        clamp_field!(
            adjustments,
            t.swing.min_rope_length,
            "swing.min_rope_length",
            0.01,
            f32::MAX
        );
        clamp_field!(
            adjustments,
            t.swing.max_rope_length,
            "swing.max_rope_length",
            t.swing.min_rope_length,
            f32::MAX
        );
        clamp_field!(
            adjustments,
            t.swing.vertical_aim_bias,
            "swing.vertical_aim_bias",
            0.0,
            1.0
        );
        clamp_field!(
            adjustments,
            t.swing.reattach_delay,
            "swing.reattach_delay",
            0.0,
            f32::MAX
        );
        if t.swing.max_anchor_candidates == 0 {
            adjustments.push(Adjustment {
                field: "swing.max_anchor_candidates",
                authored: 0.0,
                applied: 1.0,
            });
            t.swing.max_anchor_candidates = 1;
        }

        // Hook
        clamp_field!(adjustments, t.hook.move_speed, "hook.move_speed", 0.0, f32::MAX);

        // Run
        clamp_field!(adjustments, t.run.max_speed, "run.max_speed", 0.0, f32::MAX);
        clamp_field!(
            adjustments,
            t.run.max_velocity_limit,
            "run.max_velocity_limit",
            0.0,
            f32::MAX
        );
        clamp_field!(adjustments, t.run.input_deadzone, "run.input_deadzone", 0.0, 1.0);

        // Wind
        clamp_field!(adjustments, t.wind.smooth_speed, "wind.smooth_speed", 0.0, f32::MAX);

        (t, adjustments)
    }
}
