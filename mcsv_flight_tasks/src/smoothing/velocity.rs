//! Single-axis jerk-limited velocity smoother.
//!
//! Drives one axis from its current (a, v, x) towards a velocity target
//! with a three phase profile:
//!
//! ```text
//!   jerk  +J ┌──┐
//!            │T1│  T2   ┌──┐
//!          0 ┘  └───────┘T3└──────── (coast, a = 0)
//!                       -J
//! ```
//!
//! `update_durations` re-plans from the current state every tick, so the
//! profile absorbs target changes without discontinuities in a or v.
//! `update_traj` evaluates the piecewise cubic at the local time.

use super::TrajectorySmoother;

/// Kinematic state of one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Trajectory {
    pub j: f32,
    pub a: f32,
    pub v: f32,
    pub x: f32,
}

/// Jerk-limited velocity trajectory generator for a single axis.
#[derive(Debug, Clone)]
pub struct VelocitySmoothing {
    max_jerk: f32,
    max_accel: f32,
    max_vel: f32,

    /// Clamped velocity target.
    vel_sp: f32,

    /// Time since the last re-plan [s].
    local_time: f32,

    // Phase durations [s].
    t1: f32,
    t2: f32,
    t3: f32,

    /// +1 / -1: sign of the jerk in phase 1. 0: already at target.
    direction: i8,

    state: Trajectory,
    /// Origin the current profile is evaluated from.
    state_init: Trajectory,
}

impl Default for VelocitySmoothing {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

#[inline]
fn sign(v: f32) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// State after `t` seconds of constant jerk `d·j` from (a0, v0, x0).
#[inline]
fn evaluate_poly(j: f32, a0: f32, v0: f32, x0: f32, t: f32, d: i8) -> Trajectory {
    let jt = f32::from(d) * j;
    let t2 = t * t;
    let t3 = t2 * t;
    Trajectory {
        j: jt,
        a: a0 + jt * t,
        v: v0 + a0 * t + 0.5 * jt * t2,
        x: x0 + v0 * t + 0.5 * a0 * t2 + jt * t3 / 6.0,
    }
}

impl VelocitySmoothing {
    pub fn new(accel: f32, vel: f32, pos: f32) -> Self {
        let mut s = Self {
            max_jerk: 0.0,
            max_accel: 0.0,
            max_vel: 0.0,
            vel_sp: 0.0,
            local_time: 0.0,
            t1: 0.0,
            t2: 0.0,
            t3: 0.0,
            direction: 0,
            state: Trajectory::default(),
            state_init: Trajectory::default(),
        };
        s.reset(accel, vel, pos);
        s
    }

    /// Current phase durations (T1, T2, T3).
    #[inline]
    pub fn durations(&self) -> (f32, f32, f32) {
        (self.t1, self.t2, self.t3)
    }

    #[inline]
    pub fn state(&self) -> Trajectory {
        self.state
    }

    /// Velocity reached if the current acceleration is ramped to zero
    /// at maximum jerk right now.
    fn vel_at_zero_acc(&self) -> f32 {
        let a = self.state.a;
        if a.abs() <= f32::EPSILON || self.max_jerk <= f32::EPSILON {
            return self.state.v;
        }
        let j_zero_acc = -f32::from(sign(a)) * self.max_jerk;
        let t_zero_acc = -a / j_zero_acc;
        self.state.v + a * t_zero_acc + 0.5 * j_zero_acc * t_zero_acc * t_zero_acc
    }

    fn compute_direction(&self) -> i8 {
        match sign(self.vel_sp - self.vel_at_zero_acc()) {
            // Braking right now lands exactly on the target: keep braking.
            0 => sign(self.state.a),
            d => d,
        }
    }

    /// Limit T1 so the acceleration at its end stays within `±a_max`.
    fn saturate_t1_for_accel(a0: f32, j_max: f32, t1: f32, a_max: f32) -> f32 {
        let a1 = a0 + j_max * t1;
        if a1 > a_max {
            (a_max - a0) / j_max
        } else if a1 < -a_max {
            (-a_max - a0) / j_max
        } else {
            t1
        }
    }

    /// Shortest T1 reaching `delta_v` with T2 = 0, `j_max` signed.
    fn compute_t1(a0: f32, delta_v: f32, j_max: f32, a_max: f32) -> f32 {
        let delta = 2.0 * a0 * a0 + 4.0 * j_max * delta_v;
        if delta < 0.0 {
            return 0.0;
        }
        let sqrt_delta = delta.sqrt();
        let t1_plus = (-a0 + 0.5 * sqrt_delta) / j_max;
        let t1_minus = (-a0 - 0.5 * sqrt_delta) / j_max;
        let t3_plus = a0 / j_max + t1_plus;
        let t3_minus = a0 / j_max + t1_minus;

        let t1 = if t1_plus >= 0.0 && t3_plus >= 0.0 {
            t1_plus
        } else if t1_minus >= 0.0 && t3_minus >= 0.0 {
            t1_minus
        } else {
            0.0
        };
        Self::saturate_t1_for_accel(a0, j_max, t1, a_max).max(0.0)
    }

    /// T1 such that T1 + T2 + T3 == `t123`.
    fn compute_t1_given_total(t123: f32, a0: f32, delta_v: f32, j_max: f32, a_max: f32) -> f32 {
        let a = -j_max;
        let b = j_max * t123 - a0;
        let delta = t123 * t123 * j_max * j_max + 2.0 * t123 * a0 * j_max
            - a0 * a0
            - 4.0 * j_max * delta_v;
        if delta < 0.0 {
            return 0.0;
        }
        let sqrt_delta = delta.sqrt();
        let denominator_inv = 1.0 / (2.0 * a);
        let t1_plus = ((-b + sqrt_delta) * denominator_inv).max(0.0);
        let t1_minus = ((-b - sqrt_delta) * denominator_inv).max(0.0);
        let t13_plus = 2.0 * t1_plus + a0 / j_max;
        let t13_minus = 2.0 * t1_minus + a0 / j_max;

        let t1 = if t13_plus > t123 {
            t1_minus
        } else if t13_minus > t123 {
            t1_plus
        } else {
            t1_plus.min(t1_minus)
        };
        Self::saturate_t1_for_accel(a0, j_max, t1, a_max).max(0.0)
    }

    #[inline]
    fn compute_t3(t1: f32, a0: f32, j_max: f32) -> f32 {
        (a0 / j_max + t1).max(0.0)
    }

    fn compute_t2(t1: f32, t3: f32, a0: f32, delta_v: f32, j_max: f32) -> f32 {
        let den = a0 + j_max * t1;
        if den.abs() <= f32::EPSILON {
            return 0.0;
        }
        let t2 = (-0.5 * t1 * t1 * j_max - t1 * t3 * j_max - t1 * a0 + 0.5 * t3 * t3 * j_max
            - t3 * a0
            + delta_v)
            / den;
        t2.max(0.0)
    }

    fn clear_durations(&mut self) {
        self.t1 = 0.0;
        self.t2 = 0.0;
        self.t3 = 0.0;
    }

    fn update_durations_minimize_total_time(&mut self) {
        let j_max = f32::from(self.direction) * self.max_jerk;
        let delta_v = self.vel_sp - self.state.v;
        self.t1 = Self::compute_t1(self.state.a, delta_v, j_max, self.max_accel);
        self.t3 = Self::compute_t3(self.t1, self.state.a, j_max);
        self.t2 = Self::compute_t2(self.t1, self.t3, self.state.a, delta_v, j_max);
    }
}

impl TrajectorySmoother for VelocitySmoothing {
    fn reset(&mut self, accel: f32, vel: f32, pos: f32) {
        self.state = Trajectory {
            j: 0.0,
            a: accel,
            v: vel,
            x: pos,
        };
        self.state_init = self.state;
        self.local_time = 0.0;
        self.direction = 0;
        self.clear_durations();
    }

    fn set_max_jerk(&mut self, max_jerk: f32) {
        self.max_jerk = max_jerk;
    }

    fn max_jerk(&self) -> f32 {
        self.max_jerk
    }

    fn set_max_accel(&mut self, max_accel: f32) {
        self.max_accel = max_accel;
    }

    fn max_accel(&self) -> f32 {
        self.max_accel
    }

    fn set_max_vel(&mut self, max_vel: f32) {
        self.max_vel = max_vel;
    }

    fn max_vel(&self) -> f32 {
        self.max_vel
    }

    fn set_current_acceleration(&mut self, accel: f32) {
        self.state.a = accel;
        self.state_init.a = accel;
    }

    fn set_current_velocity(&mut self, vel: f32) {
        self.state.v = vel;
        self.state_init.v = vel;
    }

    fn set_current_position(&mut self, pos: f32) {
        self.state.x = pos;
        self.state_init.x = pos;
    }

    fn update_traj(&mut self, dt: f32) {
        self.local_time += dt;
        let t = self.local_time;
        let (t1, t2, t3) = (self.t1, self.t2, self.t3);

        let (p1, p2, p3, p4) = if t <= t1 {
            (t, 0.0, 0.0, 0.0)
        } else if t <= t1 + t2 {
            (t1, t - t1, 0.0, 0.0)
        } else if t <= t1 + t2 + t3 {
            (t1, t2, t - t1 - t2, 0.0)
        } else {
            (t1, t2, t3, t - t1 - t2 - t3)
        };

        let d = self.direction;
        let j = self.max_jerk;
        let mut s = self.state_init;
        s.j = 0.0;
        if p1 > 0.0 {
            s = evaluate_poly(j, s.a, s.v, s.x, p1, d);
        }
        if p2 > 0.0 {
            s = evaluate_poly(0.0, s.a, s.v, s.x, p2, 0);
        }
        if p3 > 0.0 {
            s = evaluate_poly(j, s.a, s.v, s.x, p3, -d);
        }
        if p4 > 0.0 {
            s = evaluate_poly(0.0, 0.0, s.v, s.x, p4, 0);
        }
        self.state = s;
    }

    fn update_durations(&mut self, vel_target: f32) {
        self.vel_sp = vel_target.clamp(-self.max_vel, self.max_vel);
        self.local_time = 0.0;
        self.state_init = self.state;

        if self.max_jerk <= f32::EPSILON || self.max_accel <= f32::EPSILON {
            self.direction = 0;
            self.clear_durations();
            return;
        }

        self.direction = self.compute_direction();
        if self.direction != 0 {
            self.update_durations_minimize_total_time();
        } else {
            self.clear_durations();
        }
    }

    fn update_durations_given_total_time(&mut self, t123: f32) {
        if self.direction == 0 || self.max_jerk <= f32::EPSILON {
            return;
        }
        let j_max = f32::from(self.direction) * self.max_jerk;
        let delta_v = self.vel_sp - self.state.v;
        self.t1 = Self::compute_t1_given_total(t123, self.state.a, delta_v, j_max, self.max_accel);
        self.t3 = Self::compute_t3(self.t1, self.state.a, j_max);
        self.t2 = (t123 - self.t1 - self.t3).max(0.0);
    }

    fn total_time(&self) -> f32 {
        self.t1 + self.t2 + self.t3
    }

    fn current_jerk(&self) -> f32 {
        self.state.j
    }

    fn current_acceleration(&self) -> f32 {
        self.state.a
    }

    fn current_velocity(&self) -> f32 {
        self.state.v
    }

    fn current_position(&self) -> f32 {
        self.state.x
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
